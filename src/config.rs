//! `key=value` command line overrides merged over JSON defaults.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{
    automaton::Rule,
    error::{Error, Result},
    grid::Edges,
};

/// Values used when the user does not override a key.
pub fn defaults() -> Map<String, Value> {
    let v = json!({
        "width": 800,
        "height": 600,
        "generations": 1000,
        "cellSize": 10,
        "frameDelayMs": 500,
    });
    match v {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

/// Turns `key=value` arguments into a JSON object. Values that look like
/// integers, floats or booleans are typed accordingly, everything else is a
/// string.
pub fn args_to_json<I, S>(args: I) -> Result<Map<String, Value>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut map = Map::new();
    for arg in args {
        let arg = arg.as_ref();
        let (key, value) = arg
            .split_once('=')
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| Error::InvalidArgument(arg.to_string()))?;
        map.insert(key.to_string(), typed_value(value));
    }
    Ok(map)
}

fn typed_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

/// Fills in every default the user left out.
pub fn merge_defaults(params: &mut Map<String, Value>) {
    for (key, value) in defaults() {
        params.entry(key).or_insert(value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub width: u32,
    pub height: u32,
    pub generations: u64,
    pub cell_size: u32,
    pub frame_delay_ms: u64,
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub cols: Option<usize>,
    #[serde(default = "default_density")]
    pub density: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_rule")]
    pub rule: String,
    #[serde(default)]
    pub wrap: bool,
    #[serde(default)]
    pub grid_lines: bool,
    #[serde(default)]
    pub stop_when_stable: bool,
}

fn default_density() -> f64 {
    0.25
}

fn default_rule() -> String {
    "B3/S23".to_string()
}

impl Params {
    /// Parses user arguments, merges defaults and returns both the typed
    /// parameters and the merged JSON they came from.
    pub fn from_args<I, S>(args: I) -> Result<(Self, Map<String, Value>)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = args_to_json(args)?;
        merge_defaults(&mut map);
        let params = Self::from_json(&map)?;
        Ok((params, map))
    }

    pub fn from_json(map: &Map<String, Value>) -> Result<Self> {
        let params: Params = serde_json::from_value(Value::Object(map.clone()))?;
        if params.cell_size == 0 {
            return Err(Error::InvalidArgument("cellSize=0".to_string()));
        }
        params.check_pixel_extent()?;
        // Validate eagerly so a bad rule fails before any screen is opened.
        params.rule()?;
        Ok(params)
    }

    /// Window size and the pixel span of an explicit grid must fit in `i32`
    /// drawing coordinates.
    fn check_pixel_extent(&self) -> Result<()> {
        let limit = i32::MAX as u64;
        for (key, px) in [("width", self.width), ("height", self.height)] {
            if px as u64 > limit {
                return Err(Error::InvalidArgument(format!("{key}={px}")));
            }
        }
        for (key, cells) in [("rows", self.rows), ("cols", self.cols)] {
            let Some(cells) = cells else { continue };
            let fits = (cells as u64)
                .checked_mul(self.cell_size as u64)
                .is_some_and(|px| px <= limit);
            if !fits {
                return Err(Error::InvalidArgument(format!(
                    "{key}={cells} with cellSize={}",
                    self.cell_size
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn rule(&self) -> Result<Rule> {
        self.rule.parse()
    }

    #[inline]
    pub fn edges(&self) -> Edges {
        if self.wrap {
            Edges::Wrapping
        } else {
            Edges::Bounded
        }
    }
}
