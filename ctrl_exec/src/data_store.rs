//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::agent::VelCmd;
use log::{info, warn};

use crate::wp_ctrl;

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the executable has been put into safe mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SafeModeCause {
    /// The pose telemetry source is not connected, so the controller's
    /// belief cannot be trusted.
    PoseTmNotConnected,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time
    pub elapsed_s: f64,

    // Safe mode variables
    /// Determines if the executable is in safe mode.
    pub safe: bool,

    /// Gives the reason for the executable being in safe mode.
    pub safe_cause: Option<SafeModeCause>,

    // WpCtrl
    pub wp_ctrl: wp_ctrl::WpCtrl,
    pub wp_ctrl_input: wp_ctrl::InputData,
    pub wp_ctrl_output: Option<VelCmd>,
    pub wp_ctrl_status_rpt: wp_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Puts the executable into safe mode with the given cause.
    ///
    /// While safe the controller is not ticked and a zero velocity command is
    /// published in place of its output.
    pub fn make_safe(&mut self, cause: SafeModeCause) {
        if !self.safe {
            warn!("Make safe requested, cause: {:?}", cause);
            self.safe = true;
            self.safe_cause = Some(cause);
        }
    }

    /// Attempts to disable the safe mode by clearing the given cause.
    ///
    /// Returns `Ok(())` if this cause was cleared and safe mode was disabled, or `Err(())`
    /// otherwise. To remove safe mode the provided cause must match the initial reason for safe
    /// mode being enabled.
    ///
    /// If safe mode was not enabled `Ok(())` is returned
    pub fn make_unsafe(&mut self, cause: SafeModeCause) -> Result<(), ()> {
        if !self.safe {
            return Ok(());
        }

        match self.safe_cause {
            Some(root_cause) => {
                if cause == root_cause {
                    self.safe = false;
                    self.safe_cause = None;
                    info!("Make unsafe requested, root cause match, safe mode disabled");
                    Ok(())
                } else {
                    Err(())
                }
            }
            None => Ok(()),
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        if self.num_cycles % (cycle_frequency_hz as u128) == 0 {
            self.is_1_hz_cycle = true;
        } else {
            self.is_1_hz_cycle = false;
        }

        self.wp_ctrl_input = wp_ctrl::InputData::default();
        self.wp_ctrl_output = None;
        self.wp_ctrl_status_rpt = wp_ctrl::StatusReport::default();

        self.elapsed_s = util::session::get_elapsed_seconds();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_safe_mode_cause_matching() {
        let mut ds = DataStore::default();

        assert!(!ds.safe);

        ds.make_safe(SafeModeCause::PoseTmNotConnected);
        assert!(ds.safe);
        assert_eq!(ds.safe_cause, Some(SafeModeCause::PoseTmNotConnected));

        // Clearing with the matching cause disables safe mode
        assert!(ds.make_unsafe(SafeModeCause::PoseTmNotConnected).is_ok());
        assert!(!ds.safe);

        // Clearing while not safe is a no-op
        assert!(ds.make_unsafe(SafeModeCause::PoseTmNotConnected).is_ok());
    }
}
