// HTTP response utilities for JSON+Brotli and PNG encoding
use crate::domain::shade::RgbaRaster;
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{HeaderValue, Response, StatusCode, header},
};
use serde::Serialize;
use tokio::io::AsyncReadExt;

/// Serialize to JSON with optional Brotli compression. Compression is
/// done manually so the negotiation stays in our hands; no
/// CompressionLayer is installed on the router.
pub async fn json_response<T: Serialize>(
    data: &T,
    compress: bool,
) -> Result<Response<Body>, StatusCode> {
    let json_bytes = serde_json::to_vec(data).map_err(|e| {
        eprintln!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (body_bytes, content_encoding) = if compress {
        let cursor = std::io::Cursor::new(json_bytes);
        let mut encoder = BrotliEncoder::new(cursor);
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await.map_err(|e| {
            eprintln!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        (compressed, Some("br"))
    } else {
        (json_bytes, None)
    };

    let mut response_builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::CONTENT_LENGTH,
            HeaderValue::from_str(&body_bytes.len().to_string()).unwrap(),
        );

    if let Some(encoding) = content_encoding {
        response_builder = response_builder.header(header::CONTENT_ENCODING, encoding);
    }

    response_builder.body(Body::from(body_bytes)).map_err(|e| {
        eprintln!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// PNG-encode the overlay raster.
pub fn png_response(raster: &RgbaRaster) -> Result<Response<Body>, StatusCode> {
    let image = image::RgbaImage::from_raw(
        raster.width as u32,
        raster.height as u32,
        raster.pixels.clone(),
    )
    .ok_or_else(|| {
        eprintln!(
            "Overlay buffer size mismatch: {}x{} with {} bytes",
            raster.width,
            raster.height,
            raster.pixels.len()
        );
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut png_bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut png_bytes),
            image::ImageFormat::Png,
        )
        .map_err(|e| {
            eprintln!("PNG encoding error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(
            header::CONTENT_LENGTH,
            HeaderValue::from_str(&png_bytes.len().to_string()).unwrap(),
        )
        .body(Body::from(png_bytes))
        .map_err(|e| {
            eprintln!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
