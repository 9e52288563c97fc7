//! Fixed-schema UI preference record.
//!
//! The record is a whitelist of typed fields layered on top of the open
//! parameter model: every field is stored as an ordinary parameter in the
//! user's flat scope, encoded as a string. Missing fields are materialised
//! from [`UI_PARAMETER_DEFAULTS`] the first time the record is touched.

use serde::{Deserialize, Serialize};

use super::Parameter;

/// Storage name and default encoded value of every fixed-schema field.
pub const UI_PARAMETER_DEFAULTS: [(&str, &str); 11] = [
    ("theme", "Dark"),
    ("useName", "true"),
    ("centerLabel", "false"),
    ("diagonalLabel", "false"),
    ("lineFullPath", "true"),
    ("lineParallelPath", "true"),
    ("lineFlowMode", "feeders"),
    ("lineFlowColorMode", "nominalVoltage"),
    ("lineFlowAlertThreshold", "100"),
    ("viewOverloadsTable", "false"),
    ("substationLayout", "horizontal"),
];

/// UI preferences of a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiParameters {
    pub theme: String,
    pub use_name: bool,
    pub center_label: bool,
    pub diagonal_label: bool,
    pub line_full_path: bool,
    pub line_parallel_path: bool,
    pub line_flow_mode: String,
    pub line_flow_color_mode: String,
    pub line_flow_alert_threshold: i32,
    pub view_overloads_table: bool,
    pub substation_layout: String,
}

impl Default for UiParameters {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl UiParameters {
    /// Record equal to the default table.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            theme: "Dark".to_string(),
            use_name: true,
            center_label: false,
            diagonal_label: false,
            line_full_path: true,
            line_parallel_path: true,
            line_flow_mode: "feeders".to_string(),
            line_flow_color_mode: "nominalVoltage".to_string(),
            line_flow_alert_threshold: 100,
            view_overloads_table: false,
            substation_layout: "horizontal".to_string(),
        }
    }

    /// Decode the record from stored parameters.
    ///
    /// Names outside the whitelist are ignored. A missing field, or one whose
    /// stored value does not parse as the field type, keeps its default.
    pub fn from_parameters(params: &[Parameter]) -> Self {
        let mut record = Self::with_defaults();
        for param in params {
            let value = param.value.as_str();
            match param.name.as_str() {
                "theme" => record.theme = value.to_string(),
                "useName" => decode_into(&mut record.use_name, &param.name, value),
                "centerLabel" => decode_into(&mut record.center_label, &param.name, value),
                "diagonalLabel" => decode_into(&mut record.diagonal_label, &param.name, value),
                "lineFullPath" => decode_into(&mut record.line_full_path, &param.name, value),
                "lineParallelPath" => {
                    decode_into(&mut record.line_parallel_path, &param.name, value);
                }
                "lineFlowMode" => record.line_flow_mode = value.to_string(),
                "lineFlowColorMode" => record.line_flow_color_mode = value.to_string(),
                "lineFlowAlertThreshold" => {
                    decode_into(&mut record.line_flow_alert_threshold, &param.name, value);
                }
                "viewOverloadsTable" => {
                    decode_into(&mut record.view_overloads_table, &param.name, value);
                }
                "substationLayout" => record.substation_layout = value.to_string(),
                _ => {}
            }
        }
        record
    }

    /// Merge an update into this record, only touching fields that are set.
    pub fn merge(&mut self, update: &UiParametersUpdate) {
        if let Some(ref theme) = update.theme {
            self.theme.clone_from(theme);
        }
        if let Some(use_name) = update.use_name {
            self.use_name = use_name;
        }
        if let Some(center_label) = update.center_label {
            self.center_label = center_label;
        }
        if let Some(diagonal_label) = update.diagonal_label {
            self.diagonal_label = diagonal_label;
        }
        if let Some(line_full_path) = update.line_full_path {
            self.line_full_path = line_full_path;
        }
        if let Some(line_parallel_path) = update.line_parallel_path {
            self.line_parallel_path = line_parallel_path;
        }
        if let Some(ref mode) = update.line_flow_mode {
            self.line_flow_mode.clone_from(mode);
        }
        if let Some(ref mode) = update.line_flow_color_mode {
            self.line_flow_color_mode.clone_from(mode);
        }
        if let Some(threshold) = update.line_flow_alert_threshold {
            self.line_flow_alert_threshold = threshold;
        }
        if let Some(view) = update.view_overloads_table {
            self.view_overloads_table = view;
        }
        if let Some(ref layout) = update.substation_layout {
            self.substation_layout.clone_from(layout);
        }
    }
}

fn decode_into<T: std::str::FromStr>(slot: &mut T, name: &str, raw: &str) {
    match raw.parse() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(
            parameter = name,
            value = raw,
            "Stored UI parameter does not parse, keeping default"
        ),
    }
}

/// Partial update of [`UiParameters`].
///
/// A field left as `None` is not touched by the update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiParametersUpdate {
    pub theme: Option<String>,
    pub use_name: Option<bool>,
    pub center_label: Option<bool>,
    pub diagonal_label: Option<bool>,
    pub line_full_path: Option<bool>,
    pub line_parallel_path: Option<bool>,
    pub line_flow_mode: Option<String>,
    pub line_flow_color_mode: Option<String>,
    pub line_flow_alert_threshold: Option<i32>,
    pub view_overloads_table: Option<bool>,
    pub substation_layout: Option<String>,
}

impl UiParametersUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.to_parameters().is_empty()
    }

    /// Encode the fields that are set as stored parameters, in table order.
    pub fn to_parameters(&self) -> Vec<Parameter> {
        let encoded = [
            ("theme", self.theme.clone()),
            ("useName", self.use_name.map(|v| v.to_string())),
            ("centerLabel", self.center_label.map(|v| v.to_string())),
            ("diagonalLabel", self.diagonal_label.map(|v| v.to_string())),
            ("lineFullPath", self.line_full_path.map(|v| v.to_string())),
            ("lineParallelPath", self.line_parallel_path.map(|v| v.to_string())),
            ("lineFlowMode", self.line_flow_mode.clone()),
            ("lineFlowColorMode", self.line_flow_color_mode.clone()),
            (
                "lineFlowAlertThreshold",
                self.line_flow_alert_threshold.map(|v| v.to_string()),
            ),
            ("viewOverloadsTable", self.view_overloads_table.map(|v| v.to_string())),
            ("substationLayout", self.substation_layout.clone()),
        ];

        encoded
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| Parameter::new(name, v)))
            .collect()
    }
}
