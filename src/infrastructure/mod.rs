pub mod logging;
pub mod editor;

pub use logging::{Logger, LoggerTrait};
pub use editor::{EditorOpener, Opener};
