//! Printer, paper format and representation configuration.
//!
//! Configuration arrives as `key = value` properties in three namespaces:
//!
//! - `printer.*` describes the embosser (raster geometry, constraints).
//! - `format.<name>.*` describes a paper format (page size, margins).
//! - `representation.*` tunes diagram layout.
//!
//! [`ConfigurationParser`] overlays user properties on a defaults source, validates
//! every key against its schema and deserializes each namespace into the typed
//! [`Printer`], [`Format`] and [`Representation`] settings.

mod model;
mod properties;
mod validator;

pub use model::{
    BarChartSettings, Constraint, FloatingDot, FloatingDotSettings, Format, GeneralSettings, ImageSettings, Margins,
    PageSize, Printer, PropertySet, Raster, RasterType, RasterizerSettings, Representation, Spacing,
};
pub use properties::Properties;
pub use validator::{Check, ConfigurationValidator, Namespace, ValidProperty, PRINTER_MODES};

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Built-in defaults: a 6-dot Index Everest embosser, A4 and A5 formats and the
/// default diagram layout parameters.
pub const DEFAULT_PROPERTIES: &str = "\
# Index Everest-D V4
printer.name = index_everest_d_v4
printer.mode = normalprinter
printer.floatingDot.support = false
printer.constraint.top = 0
printer.constraint.left = 0
printer.raster.constraint.top = 0
printer.raster.constraint.left = 0
printer.raster.constraint.width = 35
printer.raster.constraint.height = 29
printer.raster.type = 6-dot
printer.raster.dotDistance.horizontal = 2.5
printer.raster.dotDistance.vertical = 2.5
printer.raster.cellDistance.horizontal = 3.5
printer.raster.cellDistance.vertical = 5.0
printer.raster.dotDiameter = 1.5

format.A4.page.width = 210
format.A4.page.height = 297
format.A4.margin.top = 0
format.A4.margin.right = 0
format.A4.margin.bottom = 0
format.A4.margin.left = 0

format.A5.page.width = 148
format.A5.page.height = 210
format.A5.margin.top = 0
format.A5.margin.right = 0
format.A5.margin.bottom = 0
format.A5.margin.left = 0

representation.general.brailleLanguage = DE_BASISSCHRIFT
representation.general.legendKeyword = Legende
representation.general.maxTitleHeight = 2
representation.rasterizer.barChart.maxBarThickness = 9
representation.rasterizer.barChart.minBarThickness = 5
representation.rasterizer.barChart.barDotPadding = 1
representation.rasterizer.barChart.barInCellPadding = 2
representation.rasterizer.barChart.extraBarCellPadding = 0
representation.rasterizer.barChart.captionLength = 6
representation.rasterizer.barChart.captionPosition = left
representation.rasterizer.barChart.textureUnitSize = 2
representation.rasterizer.image.threshold = 80
representation.rasterizer.image.quantifiedPositions = true
representation.rasterizer.image.preventOverStretch = true
representation.rasterizer.image.preserveAspectRatio = true
";

/// Validated configuration split by namespace.
#[derive(Debug, Clone)]
pub struct ConfigurationParser {
    printer: Printer,
    formats: BTreeMap<String, Format>,
    representation: Representation,
}

impl ConfigurationParser {
    /// Overlay `user` on `defaults`, validate and split into namespaces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] for the first invalid key or value and
    /// [`Error::ConfigMissing`] when a namespace lacks required properties.
    pub fn parse(user: &Properties, defaults: &Properties) -> Result<Self> {
        let mut merged = defaults.clone();
        merged.merge(user);

        let validator = ConfigurationValidator::new();
        let mut printer = PropertySet::new(Namespace::Printer.to_string());
        let mut formats: BTreeMap<String, PropertySet> = BTreeMap::new();
        let mut representation = PropertySet::new(Namespace::Representation.to_string());

        for (key, value) in merged.iter() {
            let valid = validator.validate(key, value)?;
            match &valid.namespace {
                Namespace::Printer => printer.insert(valid.name, valid.value),
                Namespace::Representation => representation.insert(valid.name, valid.value),
                Namespace::Format(name) => formats
                    .entry(name.clone())
                    .or_insert_with(|| PropertySet::new(valid.namespace.to_string()))
                    .insert(valid.name, valid.value),
            }
        }

        validator.check_complete(&Namespace::Printer, printer.names())?;
        for (name, set) in &formats {
            validator.check_complete(&Namespace::Format(name.clone()), set.names())?;
        }

        debug!(
            properties = merged.len(),
            formats = formats.len(),
            "configuration validated"
        );

        let formats = formats
            .into_iter()
            .map(|(name, set)| Ok((name.clone(), set.deserialize::<Format>()?.with_name(name))))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self { printer: printer.deserialize()?, formats, representation: representation.deserialize()? })
    }

    /// Configuration from the built-in defaults only.
    pub fn with_defaults() -> Result<Self> {
        Self::parse(&Properties::new(), &Properties::parse(DEFAULT_PROPERTIES)?)
    }

    /// Built-in defaults overridden by properties given as text.
    pub fn with_overrides(user: &str) -> Result<Self> {
        Self::parse(&Properties::parse(user)?, &Properties::parse(DEFAULT_PROPERTIES)?)
    }

    /// Load a user file, and optionally a defaults file in place of the built-in
    /// defaults.
    pub fn from_files(user: impl AsRef<Path>, defaults: Option<&Path>) -> Result<Self> {
        let defaults = match defaults {
            Some(path) => Properties::load(path)?,
            None => Properties::parse(DEFAULT_PROPERTIES)?,
        };
        Self::parse(&Properties::load(user)?, &defaults)
    }

    /// Printer configuration.
    #[must_use]
    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    /// Named paper format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormat`] if no format of that name was configured.
    pub fn format(&self, name: &str) -> Result<&Format> {
        self.formats.get(name).ok_or_else(|| Error::UnknownFormat(name.to_string()))
    }

    /// Names of all configured formats.
    pub fn format_names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    /// Representation parameters.
    #[must_use]
    pub fn representation(&self) -> &Representation {
        &self.representation
    }
}
