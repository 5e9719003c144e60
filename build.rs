use std::fs;

fn main() {
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={config_path}");

    let content = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("cannot read bundled config {config_path}: {e}"));

    if let Err(e) = content.parse::<toml::Table>() {
        panic!("bundled config {config_path} is not valid TOML: {e}");
    }
}
