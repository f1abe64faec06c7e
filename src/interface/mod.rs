pub mod prompts;
pub mod render;

pub use prompts::{parse_number, prompt_number, prompt_path, prompt_target, prompt_yes_no};
pub use render::{batch_mass, display_blend, display_ingredients};
