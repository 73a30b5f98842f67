//! # Print Jobs
//!
//! Ties the pipeline together for one print:
//!
//! ```text
//! PrintParameters ─► prepare ─► raster::build ─┬─► write_to_file   (dry run)
//!                                              └─► SerialPort
//!                                                   [cancel_and_reset]
//!                                                   print_job
//! ```
//!
//! The image is checked before anything else happens, so a missing file
//! never opens the serial port.

use crate::config::PrintParameters;
use crate::diagnostics::Diagnostics;
use crate::error::PrintError;
use crate::raster::{self, RasterJob};
use crate::render::prepare;
use crate::transport::{self, Link, SerialPort};

/// Run one print from start to finish.
///
/// With `dry_run` set the job stream goes to that file and no serial port is
/// opened. Otherwise `device` is required.
pub fn run(params: &PrintParameters, diag: &dyn Diagnostics) -> Result<(), PrintError> {
    if params.dry_run.is_none() && params.device.is_none() {
        return Err(PrintError::Usage(
            "a serial device is required unless a dry-run file is given".to_string(),
        ));
    }

    let job = render(params, diag)?;

    if let Some(path) = &params.dry_run {
        return transport::write_to_file(path, &job, diag);
    }

    let Some(device) = params.device.as_deref() else {
        return Err(PrintError::Usage("missing serial device".to_string()));
    };
    diag.info(&format!("Opening {} @ {} 8N1", device, params.baud));
    let mut port = SerialPort::open(device, params.baud)?;
    send(&mut port, &job, params, diag)?;
    diag.info("Done");
    Ok(())
}

/// Prepare the image and cut it into bands.
pub fn render(params: &PrintParameters, diag: &dyn Diagnostics) -> Result<RasterJob, PrintError> {
    if !params.image.exists() {
        return Err(PrintError::ImageNotFound(params.image.clone()));
    }
    let bitmap = prepare::prepare(&params.image, &params.prepare_options(), diag)?;
    raster::build(bitmap, params.invert, params.row_limit, diag)
}

/// Send a rendered job over `link`, cancelling first if asked to.
pub fn send<L: Link + ?Sized>(
    link: &mut L,
    job: &RasterJob,
    params: &PrintParameters,
    diag: &dyn Diagnostics,
) -> Result<(), PrintError> {
    if params.pre_cancel {
        transport::cancel_and_reset(link, diag)?;
    }
    transport::print_job(link, job, &params.pacing(), diag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use crate::transport::WriterLink;
    use image::{GrayImage, Luma};
    use std::path::PathBuf;
    use std::time::Duration;

    fn fixture(name: &str, width: u32, height: u32) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "escpos-raster-job-{}-{}.png",
            std::process::id(),
            name
        ));
        GrayImage::from_fn(width, height, |x, _| Luma([if x % 2 == 0 { 0 } else { 255 }]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_missing_device_without_dry_run_is_usage_error() {
        let params = PrintParameters {
            image: PathBuf::from("whatever.png"),
            ..Default::default()
        };
        let err = run(&params, &MemoryDiagnostics::new()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_image_never_opens_port() {
        let diag = MemoryDiagnostics::new();
        let params = PrintParameters::new("/nonexistent/photo.jpg", "/nonexistent/ttyS0");
        let err = run(&params, &diag).unwrap_err();
        assert!(matches!(err, PrintError::ImageNotFound(_)));
        assert!(!diag.contains("Opening"));
    }

    #[test]
    fn test_dry_run_needs_no_device() {
        let image = fixture("dry", 16, 32);
        let out = image.with_extension("bin");
        let params = PrintParameters {
            image: image.clone(),
            target_width: 16,
            dry_run: Some(out.clone()),
            ..Default::default()
        };
        run(&params, &MemoryDiagnostics::new()).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        std::fs::remove_file(&out).ok();
        std::fs::remove_file(&image).ok();
        assert_eq!(&bytes[..4], &[0x1B, 0x40, 0x1B, 0x32]);
        assert_eq!(&bytes[4..12], &[0x1D, 0x76, 0x30, 0x00, 2, 0, 32, 0]);
        assert_eq!(bytes.len(), 4 + 8 + 64 + 6);
    }

    #[test]
    fn test_send_with_pre_cancel() {
        let image = fixture("send", 8, 16);
        let params = PrintParameters {
            image: image.clone(),
            target_width: 8,
            pre_cancel: true,
            line_sleep: Duration::ZERO,
            ..Default::default()
        };
        let diag = MemoryDiagnostics::new();
        let job = render(&params, &diag).unwrap();
        std::fs::remove_file(&image).ok();

        let mut link = WriterLink::new(Vec::new());
        send(&mut link, &job, &params, &diag).unwrap();
        let bytes = link.into_inner();
        assert_eq!(&bytes[..3], &[0x18, 0x18, 0x18]);
        assert_eq!(&bytes[10..14], &[0x1B, 0x40, 0x1B, 0x32]);
    }
}
