//! Bounded scalars standing in for the values an optimizer adjusts.

/// A named scalar with inclusive bounds.
///
/// The bounds describe the range a fit may explore. They are not enforced by
/// [`Parameter::set_value`]; the layers only ever read the current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: f64,
    lower: f64,
    upper: f64,
}

/// Initial value for a layer parameter: either a plain number, which gets
/// wrapped with the layer's default bounds and name, or an existing
/// parameter, which is taken as is.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamInit {
    Value(f64),
    Parameter(Parameter),
}

impl ParamInit {
    /// Plain numbers as initial values.
    pub fn values(values: &[f64]) -> Vec<ParamInit> {
        values.iter().copied().map(ParamInit::Value).collect()
    }
}

impl From<f64> for ParamInit {
    fn from(v: f64) -> Self {
        ParamInit::Value(v)
    }
}

impl From<Parameter> for ParamInit {
    fn from(p: Parameter) -> Self {
        ParamInit::Parameter(p)
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: f64, lower: f64, upper: f64) -> Self {
        Parameter {
            name: name.into(),
            value,
            lower,
            upper,
        }
    }

    /// Unbounded parameter.
    pub fn free(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Build a parameter from `init`, applying `limits` and `name` only when
    /// `init` is a bare number.
    pub fn default_from(
        init: impl Into<ParamInit>,
        limits: (f64, f64),
        name: impl Into<String>,
    ) -> Self {
        match init.into() {
            ParamInit::Value(v) => Self::new(name, v, limits.0, limits.1),
            ParamInit::Parameter(p) => p,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

/// Current values of a parameter list.
pub(crate) fn values(params: &[Parameter]) -> Vec<f64> {
    params.iter().map(Parameter::value).collect()
}

/// Wrap each initial value as `"{name} {part}[i]"` with the given limits.
pub(crate) fn sequence(
    inits: Vec<ParamInit>,
    limits: (f64, f64),
    name: &str,
    part: &str,
) -> Vec<Parameter> {
    inits
        .into_iter()
        .enumerate()
        .map(|(i, p)| Parameter::default_from(p, limits, format!("{name} {part}[{i}]")))
        .collect()
}
