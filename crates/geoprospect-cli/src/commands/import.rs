use crate::cli::ImportArgs;
use crate::errors::{boundary_file_not_found, import_failed, invalid_boundary};
use crate::output::OutputWriter;
use crate::output_types::{ImportOutput, VertexRow};
use anyhow::{Context, Result};
use geoprospect_core::config::LayeredConfig;
use geoprospect_core::formats::{check_upload, import_boundary, BoundaryImport, HeaderDetection};
use geoprospect_core::models::Boundary;
use geoprospect_core::spatial::{validate_boundary, ValidationResult};
use std::fs;
use std::path::Path;

pub fn execute(args: ImportArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let (import, validation) = load_boundary(&args.path, config)?;
    let boundary = Boundary::new(import.coordinates.clone());
    let issues: Vec<String> = validation
        .issues
        .iter()
        .map(|issue| format!("{}: {}", issue.location, issue.reason))
        .collect();

    let file = args.path.display().to_string();
    let summary = ImportOutput::new(file.clone(), &import, boundary.centroid(), issues);

    if output.is_json() {
        let geojson = if args.geojson { Some(boundary.to_geojson()) } else { None };
        return output.result(serde_json::json!({
            "import": summary,
            "coordinates": import.coordinates,
            "geojson": geojson,
        }));
    }

    output.success(format!("Imported {} vertices from {}", summary.vertices, file));

    output.section("Column Mapping");
    output.kv("Delimiter", format!("{:?}", import.mapping.delimiter));
    output.kv("Latitude column", import.mapping.lat_column);
    output.kv("Longitude column", import.mapping.lng_column);
    output.kv("Header", describe_header(import.mapping.header));
    output.kv("Skipped rows", import.skipped_rows);
    if let Some(centroid) = summary.centroid {
        output.kv("Centroid", centroid.format_for_prompt());
    }

    for issue in &summary.issues {
        output.warning(format!("Boundary issue: {}", issue));
    }
    if !summary.enforceable {
        output.warning("Fewer than 3 vertices: the boundary is provisional and will not be enforced as an area");
    }

    output.section("Vertices");
    output.table(VertexRow::rows(&import.coordinates));

    if args.geojson {
        output.section("GeoJSON");
        let feature = serde_json::to_string_pretty(&boundary.to_geojson())
            .context("Failed to serialize boundary as GeoJSON")?;
        output.text(feature);
    }

    Ok(())
}

/// Read, check, import and validate a boundary CSV
pub fn load_boundary(path: &Path, config: &LayeredConfig) -> Result<(BoundaryImport, ValidationResult)> {
    let metadata = fs::metadata(path).map_err(|_| boundary_file_not_found(path))?;
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

    check_upload(&file_name, metadata.len(), config.max_import_bytes.value)
        .map_err(|e| import_failed(path, &e))?;

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read boundary file {}", path.display()))?;
    let import = import_boundary(&text).map_err(|e| import_failed(path, &e))?;

    let boundary = Boundary::new(import.coordinates.clone());
    let validation =
        validate_boundary(&boundary, &config.boundary_limits(), config.boundary_validity.value)
            .map_err(|e| invalid_boundary(&e))?;

    tracing::debug!(
        path = %path.display(),
        vertices = import.coordinates.len(),
        skipped = import.skipped_rows,
        "Loaded boundary file"
    );
    Ok((import, validation))
}

fn describe_header(header: HeaderDetection) -> &'static str {
    match header {
        HeaderDetection::Matched => "matched by column names",
        HeaderDetection::NumericFirstRow => "none (first row is data)",
        HeaderDetection::AssumedHeader => "unrecognised, skipped (columns 0/1 assumed)",
    }
}
