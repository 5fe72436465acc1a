pub mod settings;

pub use settings::{ColorMode, Options, OptionsPatch};
