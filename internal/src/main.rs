use std::fs::{self, File};
use std::path::Path;

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .expect("usage: batch_run <instance.json>");

    let input_data = fs::read_to_string(&path).expect("Error reading instance file");
    let input_data: serde_json::Value =
        serde_json::from_str(&input_data).expect("Error parsing instance file");
    println!("\n---------- RUN: {} ----------", path);

    let output = internal::run(input_data);

    let instance_name = Path::new(&path)
        .file_name()
        .expect("Error getting instance file name");
    let output_dir = Path::new("output");
    fs::create_dir_all(output_dir).expect("Error creating output directory");
    let output_path = output_dir.join(format!("output_{}", instance_name.to_string_lossy()));
    let file = File::create(&output_path).expect("Error creating output file");
    serde_json::to_writer_pretty(file, &output).expect("Error writing JSON");
    println!("assignment written to {}", output_path.display());
}
