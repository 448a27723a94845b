//! Incremental rotation driven by an absolute pointer position.

use serde::Serialize;

/// Progress of a rotate-handle drag.
///
/// A drag starts `Armed`; the first pointer sample only records the angle and
/// the layer's rotation, later samples accumulate the shortest signed arc
/// since the previous one. The value is owned by the interaction controller
/// and dropped on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RotationDrag {
    #[default]
    Armed,
    Tracking {
        /// Pointer angle around the pivot at the previous sample.
        last_angle: f64,
        /// Layer rotation when tracking began.
        start_rotation: f64,
        /// Unsnapped pointer sweep since tracking began.
        swept: f64,
    },
}

impl RotationDrag {
    pub fn is_tracking(&self) -> bool {
        matches!(self, RotationDrag::Tracking { .. })
    }
}
