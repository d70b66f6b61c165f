//! Binary for building WASM contracts from odra modules.
#![doc = "Binary for building WASM contracts from odra modules."]

#[allow(unused_imports)]
use bamm_contracts;

fn main() {
    // Compilation to WASM is driven by odra-build; this binary only links the modules in.
}
