//! Configuration section definitions.
//!
//! Each module corresponds to a section in `declass.toml`:
//!
//! | Module       | TOML Section   | Purpose                               |
//! |--------------|----------------|---------------------------------------|
//! | `stylesheet` | `[stylesheet]` | CSS inputs and their joiner           |
//! | `classes`    | `[classes]`    | Custom classes, filter, presets       |
//! | `hooks`      | `[hooks]`      | Script hook prefixes                  |
//! | `markup`     | `[markup]`     | HTML inputs, template guard           |
//! | `output`     | `[output]`     | Destination, fallback, dry run        |

mod classes;
mod hooks;
mod markup;
mod output;
mod stylesheet;

pub use classes::ClassesConfig;
pub use hooks::HooksConfig;
pub use markup::MarkupConfig;
pub use output::OutputConfig;
pub use stylesheet::StylesheetConfig;
