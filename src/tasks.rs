//! The discovery tasks shipped with the pipeline.
//!
//! Each task embeds a signature for one function of the target binary and
//! runs the full locate/expand/match/extract pipeline against the host.
//! Tasks are independent: a failure is reported as one labeled diagnostic
//! and the run proceeds to the next task. There are no retries — a
//! signature or pattern that stopped matching means the binary changed
//! shape and the embedded data must be regenerated.

use once_cell::sync::Lazy;
use tracing::{info, warn};

use crate::analysis::extract;
use crate::analysis::host::AnalysisHost;
use crate::analysis::{expand, locate};
use crate::core::{OffsetDescriptor, Signature};
use crate::error::{Error, Result};

/// Label of the try-on toggle task.
pub const TOGGLE_LABEL: &str = "TryOn Toggle";
/// Label of the try-on item-array task.
pub const ITEMS_LABEL: &str = "TryOn Items";

static TOGGLE_SIGNATURE: Lazy<Signature> = Lazy::new(|| {
    Signature::parse(
        Some("Client::UI::Agent::AgentTryon_ReceiveEvent"),
        "48 89 5C 24 ?? 56 57 41 54 41 55 41 57 48 81 EC B0 00 00 00 48 8B D9",
        "7.3.1",
    )
    .expect("valid embedded toggle signature")
});

static ITEMS_SIGNATURE: Lazy<Signature> = Lazy::new(|| {
    Signature::parse(
        Some("Client::UI::Agent::AgentTryon.TryOn"),
        "48 89 5C 24 ?? 48 89 6C 24 ?? 48 89 74 24 ?? 57 41 56 41 57 48 83 EC 30 8B F9",
        "7.3.1",
    )
    .expect("valid embedded items signature")
});

/// Recover the offset of the boolean field the try-on event handler guards.
pub fn discover_toggle_offset<H: AnalysisHost>(host: &H) -> Result<OffsetDescriptor> {
    let entry = locate(host, &TOGGLE_SIGNATURE).ok_or_else(|| Error::NotFound {
        what: "AgentTryon_ReceiveEvent".to_string(),
    })?;
    let instructions = expand(host, entry)?;
    let offset = extract::field_offset(&instructions)?;
    Ok(OffsetDescriptor::FieldOffset {
        label: TOGGLE_LABEL.to_string(),
        offset,
        verified: TOGGLE_SIGNATURE.verified.clone(),
    })
}

/// Recover the try-on item array's base offset, element size, and length.
///
/// Two-pass: the try-on entry point is searched for the call that hands the
/// items to the worker function, then the worker's array-iteration idiom
/// yields the three values.
pub fn discover_item_layout<H: AnalysisHost>(host: &H) -> Result<OffsetDescriptor> {
    let entry = locate(host, &ITEMS_SIGNATURE).ok_or_else(|| Error::NotFound {
        what: "AgentTryon.TryOn".to_string(),
    })?;
    let instructions = expand(host, entry)?;
    let facts = extract::array_layout(host, &instructions)?;
    Ok(OffsetDescriptor::ArrayLayout {
        label: ITEMS_LABEL.to_string(),
        offset: facts.offset,
        element_size: facts.element_size,
        length: facts.length,
        verified: ITEMS_SIGNATURE.verified.clone(),
    })
}

/// Run every discovery task against `host`, logging one diagnostic line
/// per task, and return the per-task results in task order.
pub fn run_all<H: AnalysisHost>(host: &H) -> Vec<Result<OffsetDescriptor>> {
    let runs = [
        (TOGGLE_LABEL, discover_toggle_offset(host)),
        (ITEMS_LABEL, discover_item_layout(host)),
    ];
    let mut results = Vec::with_capacity(runs.len());
    for (label, result) in runs {
        match &result {
            Ok(descriptor) => info!("{}", descriptor),
            Err(err) => warn!("[{}] {}", label, err),
        }
        results.push(result);
    }
    results
}
