use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Validate the integrity of an HMSA file pair
pub fn run(file: PathBuf) -> Result<()> {
    use hmsa::validator::validate_hmsa_file;

    info!("HMSA Validator");
    info!("File: {}", file.display());

    let report = validate_hmsa_file(&file);

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
