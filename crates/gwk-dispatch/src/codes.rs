//! Error-code classification table.
//!
//! The gateway multiplexes very different conditions onto one numeric error
//! channel. This module is the single place those numbers acquire meaning:
//! [`classify`] maps a code to the full set of actions the dispatcher takes,
//! evaluated once per event.
//!
//! The policy, reproduced exactly:
//!
//! | Code(s)            | Action                                            |
//! |--------------------|---------------------------------------------------|
//! | 1100               | connectivity lost → `Disconnected`                |
//! | 1101, 1102         | connectivity restored → recovery sequence         |
//! | 317                | market-depth reset for the targeted strategy      |
//! | 200, 309           | invalid request → model-error event for the UI    |
//! | 2104, 2106, 2107, 317 | suppressed from alerting                       |
//! | every code         | always reported textually                         |

/// Connectivity between the gateway and the upstream server has been lost.
pub const CODE_CONNECTIVITY_LOST: i32 = 1100;
/// Connectivity restored, upstream data lost.
pub const CODE_CONNECTIVITY_RESTORED_DATA_LOST: i32 = 1101;
/// Connectivity restored, upstream data maintained. Executions are
/// re-requested either way; replays are idempotent downstream.
pub const CODE_CONNECTIVITY_RESTORED_DATA_MAINTAINED: i32 = 1102;
/// Market depth data has been reset upstream.
pub const CODE_DEPTH_RESET: i32 = 317;
/// Invalid contract / request rejected.
pub const CODE_BAD_CONTRACT: i32 = 200;
/// Market depth requested for more instruments than the session allows.
pub const CODE_DEPTH_LIMIT: i32 = 309;

/// Codes that never trigger an out-of-band alert (routine status notices,
/// plus the depth reset which is handled in-band).
const ALERT_SUPPRESSED: [i32; 4] = [2104, 2106, 2107, CODE_DEPTH_RESET];

/// Everything the dispatcher does for one error code.
///
/// Flags are not mutually exclusive by construction, but the code space
/// keeps them disjoint in practice (e.g. 317 is a reset and suppressed from
/// alerting).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeClass {
    pub connectivity_lost: bool,
    pub connectivity_restored: bool,
    pub depth_reset: bool,
    pub invalid_request: bool,
    /// Send an out-of-band alert in addition to the textual report.
    pub alert: bool,
}

/// Classify a gateway error code. Total: every `i32` maps to a class; codes
/// with no special handling report (and alert) only.
pub fn classify(code: i32) -> CodeClass {
    CodeClass {
        connectivity_lost: code == CODE_CONNECTIVITY_LOST,
        connectivity_restored: code == CODE_CONNECTIVITY_RESTORED_DATA_LOST
            || code == CODE_CONNECTIVITY_RESTORED_DATA_MAINTAINED,
        depth_reset: code == CODE_DEPTH_RESET,
        invalid_request: code == CODE_BAD_CONTRACT || code == CODE_DEPTH_LIMIT,
        alert: !ALERT_SUPPRESSED.contains(&code),
    }
}
