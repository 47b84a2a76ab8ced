use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use glyphfield_common::TextureHandle;

/// A named slot in the shader parameter schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Param {
    Texture,
    Time,
    NumCells,
    GridColumns,
    GridRows,
    UsedLength,
    Weight1,
    Weight2,
    Weight3,
}

/// Value type declared for a schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Float,
    Texture,
}

/// A tagged parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Float(f32),
    /// `None` while the texture slot is unbound.
    Texture(Option<TextureHandle>),
}

/// One schema row: parameter and its default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub param: Param,
    pub default: ParamValue,
}

/// The contract shared with the shader program. Order matches `Param`.
pub const SCHEMA: [ParamSpec; 9] = [
    ParamSpec {
        param: Param::Texture,
        default: ParamValue::Texture(None),
    },
    ParamSpec {
        param: Param::Time,
        default: ParamValue::Float(0.0),
    },
    ParamSpec {
        param: Param::NumCells,
        default: ParamValue::Float(0.0),
    },
    ParamSpec {
        param: Param::GridColumns,
        default: ParamValue::Float(1.0),
    },
    ParamSpec {
        param: Param::GridRows,
        default: ParamValue::Float(1.0),
    },
    ParamSpec {
        param: Param::UsedLength,
        default: ParamValue::Float(1.0),
    },
    ParamSpec {
        param: Param::Weight1,
        default: ParamValue::Float(1.0),
    },
    ParamSpec {
        param: Param::Weight2,
        default: ParamValue::Float(0.0),
    },
    ParamSpec {
        param: Param::Weight3,
        default: ParamValue::Float(0.0),
    },
];

/// Errors from parameter access outside the schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown shader parameter '{0}'")]
    Unknown(String),
    #[error("shader parameter '{name}' expects {expected:?}, got {found:?}")]
    TypeMismatch {
        name: &'static str,
        expected: ParamKind,
        found: ParamKind,
    },
}

impl Param {
    pub const ALL: [Param; 9] = [
        Param::Texture,
        Param::Time,
        Param::NumCells,
        Param::GridColumns,
        Param::GridRows,
        Param::UsedLength,
        Param::Weight1,
        Param::Weight2,
        Param::Weight3,
    ];

    /// Blend weight parameters, channel 1 first.
    pub const WEIGHTS: [Param; 3] = [Param::Weight1, Param::Weight2, Param::Weight3];

    /// Name as seen by the shader program.
    pub fn as_str(self) -> &'static str {
        match self {
            Param::Texture => "texture",
            Param::Time => "time",
            Param::NumCells => "numCells",
            Param::GridColumns => "gridColumns",
            Param::GridRows => "gridRows",
            Param::UsedLength => "usedLength",
            Param::Weight1 => "weight1",
            Param::Weight2 => "weight2",
            Param::Weight3 => "weight3",
        }
    }

    pub fn kind(self) -> ParamKind {
        match self {
            Param::Texture => ParamKind::Texture,
            _ => ParamKind::Float,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Param {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Param::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParamError::Unknown(s.to_string()))
    }
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Texture(_) => ParamKind::Texture,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Texture(_) => None,
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v)
    }
}

impl From<TextureHandle> for ParamValue {
    fn from(handle: TextureHandle) -> Self {
        ParamValue::Texture(Some(handle))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{v:.4}"),
            ParamValue::Texture(Some(handle)) => write!(f, "texture#{}", handle.0),
            ParamValue::Texture(None) => f.write_str("unbound"),
        }
    }
}

/// Scalar parameters packed for a GPU uniform buffer.
///
/// Field order and types match the `FieldParams` struct in the WGSL shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FieldUniforms {
    pub time: f32,
    pub num_cells: f32,
    pub grid_columns: f32,
    pub grid_rows: f32,
    pub used_length: f32,
    pub weight1: f32,
    pub weight2: f32,
    pub weight3: f32,
}

/// Named values consumed by the shader each frame.
///
/// Only the names in [`SCHEMA`] exist; every write is type-checked against
/// the schema entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderParameterSet {
    values: [ParamValue; 9],
}

impl Default for ShaderParameterSet {
    fn default() -> Self {
        Self {
            values: SCHEMA.map(|spec| spec.default),
        }
    }
}

impl ShaderParameterSet {
    /// A set holding every schema default, texture unbound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter by shader name.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<(), ParamError> {
        let param: Param = name
            .parse()
            .inspect_err(|_| tracing::debug!(name, "rejected write to unknown shader parameter"))?;
        self.set_param(param, value.into())
    }

    /// Current value of a parameter by shader name.
    pub fn get(&self, name: &str) -> Result<ParamValue, ParamError> {
        let param: Param = name.parse()?;
        Ok(self.value(param))
    }

    pub fn set_param(&mut self, param: Param, value: ParamValue) -> Result<(), ParamError> {
        if value.kind() != param.kind() {
            return Err(ParamError::TypeMismatch {
                name: param.as_str(),
                expected: param.kind(),
                found: value.kind(),
            });
        }
        self.values[param.slot()] = value;
        Ok(())
    }

    pub fn value(&self, param: Param) -> ParamValue {
        self.values[param.slot()]
    }

    pub fn set_float(&mut self, param: Param, value: f32) -> Result<(), ParamError> {
        self.set_param(param, ParamValue::Float(value))
    }

    pub fn float(&self, param: Param) -> Result<f32, ParamError> {
        let value = self.value(param);
        value.as_float().ok_or(ParamError::TypeMismatch {
            name: param.as_str(),
            expected: ParamKind::Float,
            found: value.kind(),
        })
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        match self.value(Param::Texture) {
            ParamValue::Texture(handle) => handle,
            ParamValue::Float(_) => None,
        }
    }

    pub fn set_texture(&mut self, handle: Option<TextureHandle>) {
        self.values[Param::Texture.slot()] = ParamValue::Texture(handle);
    }

    /// Blend weights, channel 1 first.
    pub fn weights(&self) -> [f32; 3] {
        Param::WEIGHTS.map(|param| self.value(param).as_float().unwrap_or_default())
    }

    pub fn set_weights(&mut self, weights: [f32; 3]) {
        for (param, weight) in Param::WEIGHTS.into_iter().zip(weights) {
            self.values[param.slot()] = ParamValue::Float(weight);
        }
    }

    /// `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        Param::ALL
            .into_iter()
            .map(|param| (param.as_str(), self.value(param)))
    }

    /// Pack the scalar parameters for upload.
    pub fn uniforms(&self) -> FieldUniforms {
        let f = |param: Param| self.value(param).as_float().unwrap_or_default();
        FieldUniforms {
            time: f(Param::Time),
            num_cells: f(Param::NumCells),
            grid_columns: f(Param::GridColumns),
            grid_rows: f(Param::GridRows),
            used_length: f(Param::UsedLength),
            weight1: f(Param::Weight1),
            weight2: f(Param::Weight2),
            weight3: f(Param::Weight3),
        }
    }
}
