//! Locates a function entry from a symbol name or a signature scan.

use tracing::debug;

use crate::analysis::host::AnalysisHost;
use crate::core::{Signature, Va};

/// Resolve the entry address of the function identified by `sig`.
///
/// The symbol name, when present and resolvable, is trusted outright and
/// the byte pattern is not checked against it. Only when the name is
/// absent or unresolved does the wildcarded byte scan run, starting at the
/// image base. `None` is a normal result, not an error; callers decide how
/// to react.
pub fn locate<H: AnalysisHost>(host: &H, sig: &Signature) -> Option<Va> {
    if let Some(name) = &sig.name {
        if let Some(va) = host.resolve_symbol(name) {
            debug!("resolved {} by symbol at {:#x}", name, va);
            return Some(va);
        }
    }
    let found = host.scan_bytes(&sig.pattern, host.image_base());
    match found {
        Some(va) => debug!("resolved by signature scan at {:#x}", va),
        None => debug!("signature {} not found in image", sig),
    }
    found
}
