/// Fallbacks applied when a run argument is omitted on the command line.
///
/// Script and template locations are relative to the install root.
pub struct DefaultsConfig {
    pub inference_script: String,
    pub config_template: String,
    pub interpreter: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            inference_script: "src/db5_inference.sh".to_string(),
            config_template: "config/single_pair_inference.yaml".to_string(),
            interpreter: "zsh".to_string(),
        }
    }
}
