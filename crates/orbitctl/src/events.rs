use crate::script::Command;
use orbit::LoadOutcome;

#[derive(Debug)]
pub enum AppEvent {
    Command(Command),
    ConfigReload,
    LoadFinished(LoadOutcome),
    Quit,
}
