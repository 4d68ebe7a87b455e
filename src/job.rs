//! Render jobs with teardown hooks.

use crate::canvas::{PlotCanvas, RasterCanvas};
use crate::config::ConfigurationParser;
use crate::diagram::Renderable;
use crate::error::Result;
use crate::render::MasterRenderer;
use std::fmt;
use tracing::{debug, info};

type Finalizer = Box<dyn FnOnce() + Send>;

/// One rendering session.
///
/// Owns the renderer and a list of finalizers. Finalizers run exactly once, in
/// reverse registration order, when the job is dropped, whether rendering
/// succeeded or not.
///
/// # Example
///
/// ```
/// use brailleplot::config::ConfigurationParser;
/// use brailleplot::job::RenderJob;
///
/// let config = ConfigurationParser::with_defaults().unwrap();
/// let mut job = RenderJob::from_config(&config, "A4").unwrap();
/// job.register_finalizer("close printer", || println!("printer closed"));
/// drop(job);
/// ```
pub struct RenderJob {
    renderer: MasterRenderer,
    finalizers: Vec<(String, Finalizer)>,
}

impl RenderJob {
    /// Job around an existing renderer.
    #[must_use]
    pub fn new(renderer: MasterRenderer) -> Self {
        Self { renderer, finalizers: Vec::new() }
    }

    /// Job for the configured printer and the format called `format`.
    pub fn from_config(config: &ConfigurationParser, format: &str) -> Result<Self> {
        Ok(Self::new(MasterRenderer::from_config(config, format)?))
    }

    /// The job's renderer.
    #[must_use]
    pub fn renderer(&self) -> &MasterRenderer {
        &self.renderer
    }

    /// Mutable access to the renderer.
    pub fn renderer_mut(&mut self) -> &mut MasterRenderer {
        &mut self.renderer
    }

    /// Run `finalizer` when the job ends.
    pub fn register_finalizer(&mut self, name: impl Into<String>, finalizer: impl FnOnce() + Send + 'static) {
        let name = name.into();
        debug!(finalizer = %name, "finalizer registered");
        self.finalizers.push((name, Box::new(finalizer)));
    }

    /// Number of pending finalizers.
    #[must_use]
    pub fn finalizer_count(&self) -> usize {
        self.finalizers.len()
    }

    /// Rasterize with the job's renderer.
    pub fn rasterize(&self, renderable: &Renderable) -> Result<RasterCanvas> {
        self.renderer.rasterize(renderable)
    }

    /// Plot with the job's renderer.
    pub fn plot(&self, renderable: &Renderable) -> Result<PlotCanvas> {
        self.renderer.plot(renderable)
    }
}

impl fmt::Debug for RenderJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderJob")
            .field("renderer", &self.renderer)
            .field("finalizers", &self.finalizers.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl Drop for RenderJob {
    fn drop(&mut self) {
        if !self.finalizers.is_empty() {
            info!(count = self.finalizers.len(), "running render job finalizers");
        }
        while let Some((name, finalizer)) = self.finalizers.pop() {
            debug!(finalizer = %name, "running finalizer");
            finalizer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::data::PointListContainer;
    use crate::diagram::BarChart;
    use std::sync::{Arc, Mutex};

    fn job() -> RenderJob {
        RenderJob::from_config(&ConfigurationParser::with_defaults().unwrap(), "A4").unwrap()
    }

    #[test]
    fn test_finalizers_run_in_reverse_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let mut j = job();
            for name in ["first", "second", "third"] {
                let log = Arc::clone(&log);
                j.register_finalizer(name, move || log.lock().unwrap().push(name));
            }
            assert_eq!(j.finalizer_count(), 3);
        }
        assert_eq!(*log.lock().unwrap(), vec!["third", "second", "first"]);
    }

    #[test]
    fn test_finalizers_run_after_failed_render() {
        let ran = Arc::new(Mutex::new(false));
        {
            let mut j = job();
            let flag = Arc::clone(&ran);
            j.register_finalizer("flag", move || *flag.lock().unwrap() = true);
            let names: Vec<String> = (0..40).map(|i| format!("c{i}")).collect();
            let chart = BarChart::new(PointListContainer::from_categories(names.iter().map(|n| (n.as_str(), 1.0))))
                .unwrap();
            assert!(j.rasterize(&chart.into()).is_err());
        }
        assert!(*ran.lock().unwrap());
    }

    #[test]
    fn test_renderer_format_switch() {
        let config = ConfigurationParser::with_defaults().unwrap();
        let mut j = job();
        j.renderer_mut().set_format(config.format("A5").unwrap().clone());
        assert_eq!(j.renderer().format().name(), "A5");
    }

    #[test]
    fn test_rasterize_through_job() {
        let j = job();
        let chart = BarChart::new(PointListContainer::from_categories([("a", 1.0)])).unwrap();
        assert!(j.rasterize(&chart.into()).unwrap().current_page().count_set() > 0);
    }
}
