//! Config negotiation between a [`FormatRequest`] and the driver's configs.
//!
//! The attribute list is built from the request, then relaxed step by step
//! until the driver reports at least one match. Among the matches the first
//! one whose color sizes equal the requested ones wins, otherwise the first
//! match is taken.

use tracing::debug;

use crate::error::{GraphicsError, GraphicsResult};
use crate::format::{FormatRequest, RenderableType, SurfaceFormat, SurfaceType};
use crate::native::{ConfigAttribute, ConfigAttributes, NativeGraphics};

/// Upper bound applied when halving the sample count.
const MAX_SAMPLES: i32 = 16;

/// Builds the initial attribute list for `request`.
///
/// Unspecified sizes become 0, which the driver treats as "smallest
/// available". A size that does not fit an `EGLint` can never match and
/// fails with [`GraphicsError::NoMatchingConfig`].
pub fn config_attributes(
    request: &FormatRequest,
    surface_type: SurfaceType,
) -> GraphicsResult<ConfigAttributes> {
    let size = |value: Option<u32>| match value {
        None => Ok(0),
        Some(v) => i32::try_from(v)
            .map_err(|_| GraphicsError::NoMatchingConfig(request.to_string())),
    };
    let samples = size(request.samples)?;

    Ok(vec![
        (ConfigAttribute::RedSize, size(request.red)?),
        (ConfigAttribute::GreenSize, size(request.green)?),
        (ConfigAttribute::BlueSize, size(request.blue)?),
        (ConfigAttribute::AlphaSize, size(request.alpha)?),
        (ConfigAttribute::DepthSize, size(request.depth)?),
        (ConfigAttribute::StencilSize, size(request.stencil)?),
        (ConfigAttribute::Samples, samples),
        (ConfigAttribute::SampleBuffers, i32::from(samples > 0)),
        (ConfigAttribute::SurfaceType, surface_type.bit()),
        (ConfigAttribute::RenderableType, request.renderable.bit()),
    ])
}

fn position(attributes: &ConfigAttributes, attribute: ConfigAttribute) -> Option<usize> {
    attributes.iter().position(|&(a, _)| a == attribute)
}

/// Relaxes `attributes` by one step. Returns `false` once nothing is left
/// to relax.
///
/// Order: samples (halved, then dropped), sample buffers, alpha, stencil
/// (down to 1, then dropped), depth (same), explicit color sizes.
pub fn reduce_attributes(attributes: &mut ConfigAttributes) -> bool {
    if let Some(i) = position(attributes, ConfigAttribute::Samples) {
        let value = attributes[i].1;
        if value > 1 {
            attributes[i].1 = (value / 2).min(MAX_SAMPLES);
        } else {
            attributes.remove(i);
        }
        return true;
    }

    if let Some(i) = position(attributes, ConfigAttribute::SampleBuffers) {
        attributes.remove(i);
        return true;
    }

    if let Some(i) = position(attributes, ConfigAttribute::AlphaSize) {
        attributes.remove(i);
        return true;
    }

    for attribute in [ConfigAttribute::StencilSize, ConfigAttribute::DepthSize] {
        if let Some(i) = position(attributes, attribute) {
            if attributes[i].1 > 1 {
                attributes[i].1 = 1;
            } else {
                attributes.remove(i);
            }
            return true;
        }
    }

    let before = attributes.len();
    attributes.retain(|&(a, _)| {
        !matches!(
            a,
            ConfigAttribute::RedSize | ConfigAttribute::GreenSize | ConfigAttribute::BlueSize
        )
    });
    attributes.len() != before
}

/// Finds a native config for `request` usable with `surface_type` surfaces.
///
/// Returns `Ok(None)` when no config matches even after relaxing every
/// attribute.
pub fn config_from_format<N: NativeGraphics>(
    native: &N,
    display: N::Display,
    request: &FormatRequest,
    surface_type: SurfaceType,
) -> GraphicsResult<Option<N::Config>> {
    let mut attributes = config_attributes(request, surface_type)?;

    let configs = loop {
        // A failing query is treated like "no match" so relaxation continues.
        let configs = native
            .choose_configs(display, &attributes)
            .unwrap_or_else(|error| {
                debug!(%error, "Config query failed");
                Vec::new()
            });
        if !configs.is_empty() {
            break configs;
        }
        if !reduce_attributes(&mut attributes) {
            return Ok(None);
        }
        debug!(?attributes, "No config matched, relaxing attributes");
    };

    let wanted = [
        (ConfigAttribute::RedSize, request.red),
        (ConfigAttribute::GreenSize, request.green),
        (ConfigAttribute::BlueSize, request.blue),
        (ConfigAttribute::AlphaSize, request.alpha),
    ];

    for &config in &configs {
        let mut exact = true;
        for (attribute, requested) in wanted {
            let Some(requested) = requested.filter(|&r| r > 0) else {
                continue;
            };
            let value = read_attribute(native, display, config, attribute)?;
            if u32::try_from(value) != Ok(requested) {
                exact = false;
                break;
            }
        }
        if exact {
            return Ok(Some(config));
        }
    }

    Ok(configs.first().copied())
}

/// Reads back the format a config actually provides.
pub fn format_from_config<N: NativeGraphics>(
    native: &N,
    display: N::Display,
    config: N::Config,
) -> GraphicsResult<SurfaceFormat> {
    let read = |attribute| {
        read_attribute(native, display, config, attribute).map(|value| value.max(0) as u32)
    };

    let renderable_bits = read_attribute(native, display, config, ConfigAttribute::RenderableType)?;

    Ok(SurfaceFormat {
        red: read(ConfigAttribute::RedSize)?,
        green: read(ConfigAttribute::GreenSize)?,
        blue: read(ConfigAttribute::BlueSize)?,
        alpha: read(ConfigAttribute::AlphaSize)?,
        depth: read(ConfigAttribute::DepthSize)?,
        stencil: read(ConfigAttribute::StencilSize)?,
        samples: read(ConfigAttribute::Samples)?,
        renderable: RenderableType::from_bits(renderable_bits).unwrap_or_default(),
    })
}

fn read_attribute<N: NativeGraphics>(
    native: &N,
    display: N::Display,
    config: N::Config,
    attribute: ConfigAttribute,
) -> GraphicsResult<i32> {
    native
        .config_attribute(display, config, attribute)
        .map_err(|source| GraphicsError::ConfigAttribute {
            attribute: attribute.name(),
            source,
        })
}
