use thurs_core::FrameInput;
use thurs_rendering::InputSource;

/// Frames in one loop of the scripted walk.
const PERIOD: u32 = 120;

/// Deterministic stand-in for a keyboard: walks, turns, sprints and knocks on
/// doors in a fixed loop.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedInput {
    dt: f32,
    total: u32,
    issued: u32,
}

impl ScriptedInput {
    /// Creates a script that yields `total` frames of length `dt`.
    pub(crate) fn new(dt: f32, total: u32) -> Self {
        Self {
            dt,
            total,
            issued: 0,
        }
    }
}

impl InputSource for ScriptedInput {
    fn next_input(&mut self) -> Option<FrameInput> {
        if self.issued >= self.total {
            return None;
        }
        let phase = self.issued % PERIOD;
        self.issued += 1;

        Some(FrameInput {
            move_forward: phase < 60 || (76..100).contains(&phase),
            turn_right: (60..75).contains(&phase),
            toggle_door: phase == 75,
            sprint: (76..100).contains(&phase),
            strafe_left: phase >= 100,
            turn_left: phase >= 100,
            ..FrameInput::idle(self.dt)
        })
    }
}
