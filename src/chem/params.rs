use super::error::Error;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

const DEFAULT_PARAMS_TOML: &str = include_str!("../../resources/default.params.toml");

static DEFAULT_PARAMS: OnceLock<Parameters> = OnceLock::new();

#[derive(Debug, Clone, Deserialize)]
pub struct Parameters {
    #[serde(default)]
    pub crippen: HashMap<String, CrippenContribution>,
    pub tpsa: TpsaParams,
    pub qed: QedParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CrippenContribution {
    pub logp: f64,
    pub mr: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TpsaParams {
    #[serde(default)]
    pub rules: Vec<TpsaRule>,
    #[serde(default)]
    pub fallback: HashMap<String, TpsaFallback>,
}

/// One Ertl contribution; unset fields match anything.
#[derive(Debug, Clone, Deserialize)]
pub struct TpsaRule {
    pub element: String,
    pub neighbors: Option<usize>,
    pub hydrogens: Option<u8>,
    pub charge: Option<i8>,
    pub single: Option<usize>,
    pub double: Option<usize>,
    pub triple: Option<usize>,
    pub aromatic: Option<usize>,
    pub three_ring: Option<bool>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TpsaFallback {
    pub base: f64,
    pub per_neighbor: f64,
    pub per_hydrogen: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QedParams {
    #[serde(default)]
    pub weights: QedWeights,
    pub mw: Desirability,
    pub alogp: Desirability,
    pub hba: Desirability,
    pub hbd: Desirability,
    pub psa: Desirability,
    pub rotb: Desirability,
    pub arom: Desirability,
    pub alerts: Desirability,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QedWeights {
    #[serde(default = "default_weight_mw")]
    pub mw: f64,
    #[serde(default = "default_weight_alogp")]
    pub alogp: f64,
    #[serde(default = "default_weight_hba")]
    pub hba: f64,
    #[serde(default = "default_weight_hbd")]
    pub hbd: f64,
    #[serde(default = "default_weight_psa")]
    pub psa: f64,
    #[serde(default = "default_weight_rotb")]
    pub rotb: f64,
    #[serde(default = "default_weight_arom")]
    pub arom: f64,
    #[serde(default = "default_weight_alerts")]
    pub alerts: f64,
}

fn default_weight_mw() -> f64 {
    0.66
}
fn default_weight_alogp() -> f64 {
    0.46
}
fn default_weight_hba() -> f64 {
    0.05
}
fn default_weight_hbd() -> f64 {
    0.61
}
fn default_weight_psa() -> f64 {
    0.06
}
fn default_weight_rotb() -> f64 {
    0.65
}
fn default_weight_arom() -> f64 {
    0.48
}
fn default_weight_alerts() -> f64 {
    0.95
}

impl Default for QedWeights {
    fn default() -> Self {
        Self {
            mw: default_weight_mw(),
            alogp: default_weight_alogp(),
            hba: default_weight_hba(),
            hbd: default_weight_hbd(),
            psa: default_weight_psa(),
            rotb: default_weight_rotb(),
            arom: default_weight_arom(),
            alerts: default_weight_alerts(),
        }
    }
}

impl QedWeights {
    pub fn as_array(&self) -> [f64; 8] {
        [
            self.mw,
            self.alogp,
            self.hba,
            self.hbd,
            self.psa,
            self.rotb,
            self.arom,
            self.alerts,
        ]
    }
}

/// Asymmetric double sigmoid `(a + b / (1 + e^-(x - c + d/2)/e) * (1 - 1 / (1 + e^-(x - c - d/2)/f))) / dmax`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Desirability {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub dmax: f64,
}

impl Desirability {
    pub fn evaluate(&self, x: f64) -> f64 {
        let rise = 1.0 + (-(x - self.c + self.d / 2.0) / self.e).exp();
        let fall = 1.0 + (-(x - self.c - self.d / 2.0) / self.f).exp();
        (self.a + self.b / rise * (1.0 - 1.0 / fall)) / self.dmax
    }
}

impl Parameters {
    fn validate(self) -> Result<Self, Error> {
        for rule in &self.tpsa.rules {
            if rule.element != "N" && rule.element != "O" {
                return Err(Error::invalid(
                    "tpsa.rules",
                    format!("element '{}' is not N or O", rule.element),
                ));
            }
        }
        for element in ["N", "O"] {
            if !self.tpsa.fallback.contains_key(element) {
                return Err(Error::invalid(
                    "tpsa.fallback",
                    format!("missing fallback for {element}"),
                ));
            }
        }
        if self.qed.weights.as_array().iter().any(|w| *w <= 0.0) {
            return Err(Error::invalid("qed.weights", "weights must be positive"));
        }
        let curves = [
            self.qed.mw,
            self.qed.alogp,
            self.qed.hba,
            self.qed.hbd,
            self.qed.psa,
            self.qed.rotb,
            self.qed.arom,
            self.qed.alerts,
        ];
        if curves
            .iter()
            .any(|c| c.dmax <= 0.0 || c.e <= 0.0 || c.f <= 0.0)
        {
            return Err(Error::invalid("qed", "dmax, e and f must be positive"));
        }
        Ok(self)
    }

    pub fn crippen(&self, atom_type: &str) -> CrippenContribution {
        self.crippen
            .get(atom_type)
            .copied()
            .unwrap_or(CrippenContribution { logp: 0.0, mr: 0.0 })
    }
}

pub fn load_parameters(custom_toml: Option<&str>) -> Result<Parameters, Error> {
    match custom_toml {
        Some(toml) => {
            let params: Parameters = toml::from_str(toml)?;
            params.validate()
        }
        None => Ok(get_default_parameters().clone()),
    }
}

pub fn get_default_parameters() -> &'static Parameters {
    DEFAULT_PARAMS.get_or_init(|| {
        toml::from_str(DEFAULT_PARAMS_TOML)
            .expect("Failed to parse embedded default parameters. This is a library bug.")
    })
}
