use anyhow::Context;
use clap::Parser;
use opencv::core::{Point2f, Vector};
use opencv::imgcodecs;
use opencv::prelude::*;

use lpr_rs::cli::{LprArgs, LprCommand, LprFormat};
use lpr_rs::decode::decode;
use lpr_rs::error::LprError;
use lpr_rs::rectify;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = LprArgs::parse();
    match args.command {
        LprCommand::Decode { plate, format } => {
            let info = decode(&plate);
            match format {
                LprFormat::Json => println!("{}", serde_json::to_string(&info)?),
                LprFormat::Text => println!("{} - {}", info.province, info.vehicle_type),
            }
        }
        LprCommand::Rectify {
            file_path,
            out,
            corners,
            flip,
            rotate,
        } => {
            let image = imgcodecs::imread(&file_path, imgcodecs::IMREAD_COLOR)
                .with_context(|| format!("failed to read {}", file_path))?;
            if image.rows() == 0 || image.cols() == 0 {
                return Err(LprError::InvalidImage).with_context(|| format!("{} is not an image", file_path));
            }

            let enhanced = rectify::enhance_contrast(&image)?;
            let rectified = match corners {
                Some(raw) => rectify::four_point_transform(&enhanced, parse_corners(&raw)?)?,
                None => rectify::deskew(&enhanced, flip, rotate)?,
            };

            imgcodecs::imwrite(&out, &rectified, &Vector::<i32>::new())
                .with_context(|| format!("failed to write {}", out))?;
            tracing::info!(%out, "rectified image written");
        }
    }
    Ok(())
}

fn parse_corners(raw: &str) -> Result<[Point2f; 4], LprError> {
    let values: Vec<f32> = raw
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|_| LprError::BadCorners(raw.to_string()))?;

    if values.len() != 8 {
        return Err(LprError::BadCorners(raw.to_string()));
    }

    Ok([
        Point2f::new(values[0], values[1]),
        Point2f::new(values[2], values[3]),
        Point2f::new(values[4], values[5]),
        Point2f::new(values[6], values[7]),
    ])
}
