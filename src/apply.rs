use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Puts an image on the desktop.
pub trait Painter {
    fn paint(&self, path: &Path);
}

impl<P: Painter + ?Sized> Painter for &P {
    fn paint(&self, path: &Path) {
        (**self).paint(path)
    }
}

/// Runs an external program with the wallpaper path as its last argument,
/// e.g. `feh --bg-fill <path>`.
#[derive(Debug, Clone)]
pub struct CommandPainter {
    program: String,
    args: Vec<String>,
}

impl CommandPainter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandPainter {
            program: program.into(),
            args,
        }
    }

    /// Builds a painter from `[program, args...]`. `None` if `command` is empty.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl Painter for CommandPainter {
    fn paint(&self, path: &Path) {
        debug!(program = %self.program, path = %path.display(), "applying wallpaper");

        // Exit status is not inspected.
        if let Err(err) = Command::new(&self.program).args(&self.args).arg(path).status() {
            warn!(program = %self.program, error = %err, "failed to run wallpaper command");
        }
    }
}
