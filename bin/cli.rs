//! CLI tool for deploying the BAMM and running keeper tasks against it.

use bamm_contracts::bamm::Bamm;
use bamm_contracts::dex::pair::Pair;
use bamm_contracts::dex::router::Router;
use bamm_contracts::dex::twap_oracle::TwapOracle;
use bamm_contracts::math::DEFAULT_FEE_BPS;
use bamm_contracts::tokens::FaucetToken;
use odra::host::{Deployer, HostEnv};
use odra::prelude::{Address, Addressable};
use odra::schema::casper_contract_schema::NamedCLType;
use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt,
    OdraCli,
};

/// TWAP window used by the liquidation price guard (30 minutes)
const ORACLE_PERIOD_MS: u64 = 30 * 60 * 1000;

/// Deploys two faucet tokens and the pair between them.
pub struct PoolDeployScript;

impl DeployScript for PoolDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use bamm_contracts::dex::pair::PairInitArgs;
        use bamm_contracts::tokens::FaucetTokenInitArgs;

        env.set_gas(300_000_000_000);
        let token_a = FaucetToken::deploy(
            env,
            FaucetTokenInitArgs {
                name: String::from("Faucet Token A"),
                symbol: String::from("FTA"),
                decimals: 18,
            },
        );
        env.set_gas(300_000_000_000);
        let token_b = FaucetToken::deploy(
            env,
            FaucetTokenInitArgs {
                name: String::from("Faucet Token B"),
                symbol: String::from("FTB"),
                decimals: 18,
            },
        );
        println!("Token A: {:?}", token_a.address());
        println!("Token B: {:?}", token_b.address());

        let _pair = Pair::load_or_deploy(
            env,
            PairInitArgs {
                token_a: token_a.address().clone(),
                token_b: token_b.address().clone(),
                fee_bps: DEFAULT_FEE_BPS,
            },
            container,
            500_000_000_000
        )?;

        Ok(())
    }
}

/// Deploys the router, the oracle and the BAMM on top of the pair.
/// Requires the pair to be deployed first.
pub struct BammDeployScript;

impl DeployScript for BammDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use bamm_contracts::bamm::contract::BammInitArgs;
        use bamm_contracts::dex::router::RouterInitArgs;
        use bamm_contracts::dex::twap_oracle::TwapOracleInitArgs;

        let pair = container.contract_ref::<Pair>(env)?;
        let pair_address = pair.address().clone();

        let router = Router::load_or_deploy(
            env,
            RouterInitArgs { pair: pair_address },
            container,
            300_000_000_000
        )?;
        let oracle = TwapOracle::load_or_deploy(
            env,
            TwapOracleInitArgs { pair: pair_address, period: ORACLE_PERIOD_MS },
            container,
            300_000_000_000
        )?;
        let _bamm = Bamm::load_or_deploy(
            env,
            BammInitArgs {
                pair: pair_address,
                router: router.address().clone(),
                oracle: oracle.address().clone(),
            },
            container,
            600_000_000_000
        )?;

        Ok(())
    }
}

/// Deploys the whole stack (pair, router, oracle, BAMM).
pub struct FullDeployScript;

impl DeployScript for FullDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        PoolDeployScript.deploy(env, container)?;
        BammDeployScript.deploy(env, container)?;
        Ok(())
    }
}

/// Liquidates an insolvent vault.
pub struct LiquidateScenario;

impl Scenario for LiquidateScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![CommandArg::new(
            "vault_owner",
            "Owner of the vault to liquidate",
            NamedCLType::Key,
        )]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut bamm = container.contract_ref::<Bamm>(env)?;
        let vault_owner = args.get_single::<Address>("vault_owner")?;

        env.set_gas(400_000_000_000);
        bamm.try_liquidate(vault_owner)?;

        println!("Vault liquidated!");
        Ok(())
    }
}

impl ScenarioMetadata for LiquidateScenario {
    const NAME: &'static str = "liquidate";
    const DESCRIPTION: &'static str = "Liquidates an insolvent vault";
}

/// Accrues interest without any other action.
pub struct AddInterestScenario;

impl Scenario for AddInterestScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args
    ) -> Result<(), Error> {
        let mut bamm = container.contract_ref::<Bamm>(env)?;

        env.set_gas(100_000_000_000);
        bamm.try_add_interest()?;

        let state = bamm.rent_state();
        println!("Rented multiplier: {}", state.rented_multiplier);
        println!("Utilization: {}", bamm.utilization());
        Ok(())
    }
}

impl ScenarioMetadata for AddInterestScenario {
    const NAME: &'static str = "add-interest";
    const DESCRIPTION: &'static str = "Accrues outstanding interest";
}

/// Prints a vault with its debt and solvency.
pub struct VaultInfoScenario;

impl Scenario for VaultInfoScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![CommandArg::new(
            "owner",
            "Owner of the vault",
            NamedCLType::Key,
        )]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let bamm = container.contract_ref::<Bamm>(env)?;
        let owner = args.get_single::<Address>("owner")?;

        let vault = bamm.get_vault(owner);
        println!("token0: {}", vault.token0);
        println!("token1: {}", vault.token1);
        println!("rented: {}", vault.rented);
        println!("debt:   {}", bamm.vault_debt(owner));
        println!("solvent: {}", bamm.is_solvent(owner));
        Ok(())
    }
}

impl ScenarioMetadata for VaultInfoScenario {
    const NAME: &'static str = "vault-info";
    const DESCRIPTION: &'static str = "Shows a vault's balances, debt and solvency";
}

/// Main function to run the CLI tool.
pub fn main() {
    OdraCli::new()
        .about("CLI tool for the BAMM liquidity rental contracts")
        // Deploy scripts
        .deploy(PoolDeployScript)
        .deploy(BammDeployScript)
        .deploy(FullDeployScript)
        // Contract references
        .contract::<Pair>()
        .contract::<Router>()
        .contract::<TwapOracle>()
        .contract::<Bamm>()
        // Scenarios
        .scenario(LiquidateScenario)
        .scenario(AddInterestScenario)
        .scenario(VaultInfoScenario)
        .build()
        .run();
}
