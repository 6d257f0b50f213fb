//! Render module - Renderer adapters for transfer graphs
//!
//! Renderers consume a [`RenderBundle`]; they never touch query results or
//! view state. A [`MountHost`] owns the renderer attached to each mount
//! target and tears the previous one down before attaching a new one, so
//! two renderers never overlay the same target.

use crate::Result;
use crate::graph::RenderBundle;
use std::collections::HashMap;
use std::io::Write;

pub mod output;

pub use output::{export_dot, output_json, output_table, to_cytoscape_json, to_dot};

/// A drawable graph output
pub trait Renderer {
    /// Draw the bundle
    fn attach(&mut self, bundle: &RenderBundle) -> Result<()>;

    /// Release whatever the renderer holds
    fn teardown(&mut self);
}

/// Output formats for [`StreamRenderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    Json,
    Dot,
    Table,
}

/// Renderer writing a textual graph to a stream
pub struct StreamRenderer<W: Write> {
    writer: W,
    format: StreamFormat,
}

impl<W: Write> StreamRenderer<W> {
    pub fn new(writer: W, format: StreamFormat) -> Self {
        Self { writer, format }
    }
}

impl<W: Write> Renderer for StreamRenderer<W> {
    fn attach(&mut self, bundle: &RenderBundle) -> Result<()> {
        match self.format {
            StreamFormat::Json => output_json(&mut self.writer, bundle),
            StreamFormat::Table => output_table(&mut self.writer, bundle),
            StreamFormat::Dot => {
                writeln!(self.writer, "{}", to_dot(bundle))?;
                Ok(())
            }
        }
    }

    fn teardown(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("Failed to flush renderer output: {}", e);
        }
    }
}

/// Owner of the renderer attached to each mount target
#[derive(Default)]
pub struct MountHost {
    mounts: HashMap<String, Box<dyn Renderer>>,
}

impl MountHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down whatever is mounted on `target`, then attach `renderer`
    pub fn draw(
        &mut self,
        target: &str,
        mut renderer: Box<dyn Renderer>,
        bundle: &RenderBundle,
    ) -> Result<()> {
        self.unmount(target);
        renderer.attach(bundle)?;
        self.mounts.insert(target.to_string(), renderer);
        Ok(())
    }

    /// Tear down the renderer on `target`, if any
    pub fn unmount(&mut self, target: &str) -> bool {
        match self.mounts.remove(target) {
            Some(mut previous) => {
                tracing::debug!("Tearing down renderer on {}", target);
                previous.teardown();
                true
            }
            None => false,
        }
    }

    pub fn is_mounted(&self, target: &str) -> bool {
        self.mounts.contains_key(target)
    }
}

impl Drop for MountHost {
    fn drop(&mut self) {
        for renderer in self.mounts.values_mut() {
            renderer.teardown();
        }
    }
}
