use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use hmsa::fileformat::{HmsaWriter, WriterConfig};
use hmsa::prelude::*;

const CHANNELS: usize = 1024;
const GAIN_EV: f64 = 10.0;
const MAP_SIZE: usize = 4;
const MAP_CHANNELS: usize = 64;

/// Generate a demonstration document
pub fn run(output: PathBuf, config: WriterConfig) -> Result<()> {
    info!("HMSA Demo Document");
    info!("==================");

    let datafile = build_demo_document()?;

    info!("Writing {}", output.with_extension("xml").display());
    let mut writer = HmsaWriter::new(config);
    writer
        .start(&datafile, &output)
        .context("Failed to start HMSA writer")?;
    while !writer
        .join(Some(Duration::from_millis(200)))
        .context("Failed to write HMSA document")?
    {
        info!("  {:.0}% {}", writer.progress() * 100.0, writer.status());
    }
    let stats = writer.get().context("Failed to write HMSA document")?;

    info!("Demo complete!");
    info!("  {}", stats);
    println!("{}", stats);
    Ok(())
}

fn build_demo_document() -> Result<DataFile> {
    let mut datafile = DataFile::new();
    let header = datafile.header_mut();
    header.set_title("Demonstration: copper on aluminium")?;
    header.set_author(LangStr::new("HMSA demo").with_alternative("fr", "Démo HMSA")?)?;
    header.set_date(chrono::Local::now().date_naive())?;

    datafile.insert_condition("Inst0", Instrument::new("Generic", "Microprobe 1")?)?;
    datafile.insert_condition("Probe0", ProbeEm::new(15.0)?)?;

    let calibration = CalibrationLinear::new("Energy", "eV", GAIN_EV, 0.0)?;
    let mut xeds = DetectorSpectrometerXEDS::new(CHANNELS as u32, calibration)?;
    xeds.set_technology(XedsTechnology::Sdd)?;
    xeds.set_window(Some(Window::new().with_layer("Al", 0.1)?));
    datafile.insert_condition("XEDS0", xeds)?;

    let spectrum = Datum::analysis1d(mock_spectrum())?
        .with_condition("Inst0", Instrument::new("Generic", "Microprobe 1")?)?
        .with_condition("Probe0", ProbeEm::new(15.0)?)?
        .with_condition("Point0", AcquisitionPoint::new(SpecimenPosition::from_xyz(0.0, 0.0, 0.0)?))?;
    datafile.insert_datum("Spectrum0", spectrum)?;

    let map = Datum::image_raster_2d_spectral(mock_map()?)?
        .with_condition("Raster0", AcquisitionRasterXY::new(MAP_SIZE as u32, MAP_SIZE as u32)?)?
        .with_condition("Probe0", ProbeEm::new(15.0)?)?;
    datafile.insert_datum("Map0", map)?;

    // Link the detector to both data.
    for datum in ["Spectrum0", "Map0"] {
        let detector = datafile
            .conditions()
            .get("XEDS0")
            .cloned()
            .context("Detector missing")?;
        datafile.insert_datum_condition(datum, "Detector", detector)?;
    }

    Ok(datafile)
}

/// Gaussian line of `height` counts centred on `energy` eV.
fn line(energy_ev: f64, height: f64, channel: usize) -> f64 {
    let x = channel as f64 * GAIN_EV;
    let sigma = 60.0;
    height * (-(x - energy_ev).powi(2) / (2.0 * sigma * sigma)).exp()
}

fn mock_spectrum() -> Vec<i32> {
    (0..CHANNELS)
        .map(|channel| {
            let background = 200.0 * (-(channel as f64) / 400.0).exp();
            let counts = background
                + line(1486.7, 5000.0, channel) // Al K-L3
                + line(8047.8, 1500.0, channel) // Cu K-L3
                + line(929.7, 800.0, channel); // Cu L3-M5
            counts.round() as i32
        })
        .collect()
}

fn mock_map() -> Result<NdArray> {
    let mut values = Vec::with_capacity(MAP_SIZE * MAP_SIZE * MAP_CHANNELS);
    for x in 0..MAP_SIZE {
        for y in 0..MAP_SIZE {
            let copper = ((x + y) as f64) / (2 * MAP_SIZE) as f64;
            for channel in 0..MAP_CHANNELS {
                let scaled = channel * CHANNELS / MAP_CHANNELS;
                let counts = line(1486.7, 300.0 * (1.0 - copper), scaled)
                    + line(8047.8, 300.0 * copper, scaled);
                values.push(counts.round() as u16);
            }
        }
    }
    Ok(NdArray::from_shape_vec(&[MAP_SIZE, MAP_SIZE, MAP_CHANNELS], values)?)
}
