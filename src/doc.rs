//! Reading and writing the hierarchical flame document ("ffdoc").
//!
//! The format is deliberately forgiving: unknown variation names,
//! malformed affine dictionaries, or missing fields degrade to
//! documented defaults instead of failing the load.  Every fallback is
//! recorded in a [`Warnings`] list so callers can surface what the
//! parser papered over.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::affine::{Affine, Matrix};
use crate::error::Error;
use crate::model::{Element, Flame, Stat};
use crate::span::Span;
use crate::variation::{Params, Varia};

/// Diagnostics accumulated while parsing a document.
#[derive(Debug, Default)]
pub struct Warnings {
    messages: Vec<String>,
}

impl Warnings {
    pub fn new() -> Warnings {
        Warnings::default()
    }

    fn note(&mut self, msg: String) {
        self.messages.push(msg);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|s| s.as_str())
    }

    pub fn into_vec(self) -> Vec<String> {
        self.messages
    }
}

/// Load an element tree from a file.  Only an unreadable or non-JSON
/// file is an error; structural problems inside degrade to defaults
/// and warnings.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<(Element, Warnings), Error> {
    let text = fs::read_to_string(&path)
        .map_err(|e| Error::Document(format!("{}: {}", path.as_ref().display(), e)))?;
    let value: Value =
        serde_json::from_str(&text).map_err(|e| Error::Document(e.to_string()))?;
    let mut warnings = Warnings::new();
    let element = element_from_value(&value, &mut warnings);
    Ok((element, warnings))
}

/// Write an element tree as pretty-printed, sorted-key JSON.
pub fn write_file<P: AsRef<Path>>(element: &Element, path: P) -> Result<(), Error> {
    let value = element_to_value(element);
    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| Error::Document(e.to_string()))?;
    fs::write(&path, text)
        .map_err(|e| Error::Document(format!("{}: {}", path.as_ref().display(), e)))?;
    Ok(())
}

// ---------------------------------------------------------------------
// parsing

pub fn element_from_value(v: &Value, w: &mut Warnings) -> Element {
    let mut elt = Element::new();
    if let Some(dict) = v.as_object() {
        elt.varias = varias_from_value(dict.get("V"), w);
        elt.flames = flames_from_value(dict.get("F"), w);
        elt.children = dict
            .get("children")
            .and_then(Value::as_array)
            .map(|a| a.iter().map(|c| element_from_value(c, w)).collect())
            .unwrap_or_default();
        elt.title = dict.get("title").and_then(Value::as_str).map(String::from);
        elt.stat = stat_from_value(dict.get("stat"), w);
    } else {
        w.note(format!("element must be an object, found {}", kind(v)));
    }
    elt
}

fn varias_from_value(v: Option<&Value>, w: &mut Warnings) -> Vec<Varia> {
    match v {
        None => vec![],
        Some(Value::Array(a)) => a.iter().filter_map(|x| varia_from_value(x, w)).collect(),
        Some(x) => varia_from_value(x, w).into_iter().collect(),
    }
}

fn varia_from_value(v: &Value, w: &mut Warnings) -> Option<Varia> {
    match v {
        Value::String(name) => Some(Varia::named(name)),
        Value::Object(dict) => {
            let name = match dict.get("name").and_then(Value::as_str) {
                Some(n) => n.to_string(),
                None => {
                    w.note("variation entry has no \"name\"".to_string());
                    return None;
                }
            };
            let mut params = Params::new();
            for (key, val) in dict {
                if key == "name" {
                    continue;
                }
                match float_from_value(val) {
                    Some(f) => params.insert(key, f),
                    None => w.note(format!(
                        "variation {}: parameter {} is not a number",
                        name, key
                    )),
                }
            }
            Some(Varia { name, params })
        }
        other => {
            w.note(format!(
                "variation entry must be a string or object, found {}",
                kind(other)
            ));
            None
        }
    }
}

fn flames_from_value(v: Option<&Value>, w: &mut Warnings) -> Vec<Flame> {
    match v {
        None => vec![],
        Some(Value::Array(a)) => a.iter().filter_map(|x| flame_from_value(x, w)).collect(),
        Some(Value::Object(_)) => flame_from_value(v.unwrap(), w).into_iter().collect(),
        Some(x) => {
            // a bare count expands to that many default flames
            if let Some(n) = x.as_u64() {
                (0..n).map(|_| Flame::new()).collect()
            } else {
                w.note(format!(
                    "flame list must be an array, object, or count, found {}",
                    kind(x)
                ));
                vec![]
            }
        }
    }
}

fn flame_from_value(v: &Value, w: &mut Warnings) -> Option<Flame> {
    let dict = match v.as_object() {
        Some(d) => d,
        None => {
            w.note(format!("flame must be an object, found {}", kind(v)));
            return None;
        }
    };
    let mut flame = Flame::new();
    match dict.get("A") {
        None => {} // identity
        Some(a) => match affine_from_value(a) {
            Some(affine) => flame.affine = affine,
            None => w.note("unrecognized affine shape, using identity".to_string()),
        },
    }
    flame.blend = floats_from_value(dict.get("B"));
    flame.color = dict.get("C").and_then(float_from_value).unwrap_or(0.0);
    Some(flame)
}

fn affine_from_value(v: &Value) -> Option<Affine> {
    match v {
        Value::Array(a) => {
            let members: Vec<Affine> = a.iter().filter_map(affine_from_value).collect();
            Some(Affine::Composite(members))
        }
        Value::Object(dict) => affine_from_dict(dict),
        _ => None,
    }
}

/// The affine variant is discriminated by the exact key set.
fn affine_from_dict(dict: &Map<String, Value>) -> Option<Affine> {
    let get = |k: &str| dict.get(k).and_then(float_from_value);
    if dict.len() == 1 {
        if let Some(angle) = get("angle") {
            return Some(Affine::Rotation { angle });
        }
    }
    if dict.len() == 2 {
        if let (Some(tx), Some(ty)) = (get("tx"), get("ty")) {
            return Some(Affine::Translation { tx, ty });
        }
        if let (Some(sx), Some(sy)) = (get("sx"), get("sy")) {
            return Some(Affine::Scale { sx, sy });
        }
        if let (Some(skx), Some(sky)) = (get("skx"), get("sky")) {
            return Some(Affine::Skew { skx, sky });
        }
    }
    if dict.len() == 6 {
        if let (Some(a), Some(b), Some(c), Some(d), Some(tx), Some(ty)) =
            (get("a"), get("b"), get("c"), get("d"), get("tx"), get("ty"))
        {
            return Some(Affine::Matrix(Matrix::new(a, b, c, d, tx, ty)));
        }
    }
    None
}

fn stat_from_value(v: Option<&Value>, w: &mut Warnings) -> Option<Stat> {
    let dict = v?.as_object()?;
    let x = span_from_value(dict.get("x"));
    let y = span_from_value(dict.get("y"));
    let vel = span_from_value(dict.get("v"));
    match (x, y, vel) {
        (Some(x), Some(y), Some(v)) => Some(Stat { x, y, v }),
        _ => {
            w.note("stat is missing a component, treating as absent".to_string());
            None
        }
    }
}

fn span_from_value(v: Option<&Value>) -> Option<Span> {
    let dict = v?.as_object()?;
    let min = dict.get("min").and_then(float_from_value)?;
    let max = dict.get("max").and_then(float_from_value)?;
    Some(Span::new(min, max))
}

fn floats_from_value(v: Option<&Value>) -> Vec<f64> {
    match v {
        None => vec![],
        Some(Value::Array(a)) => a.iter().filter_map(float_from_value).collect(),
        Some(x) => float_from_value(x).into_iter().collect(),
    }
}

/// Numbers parse directly; numeric strings are accepted too.
fn float_from_value(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------
// serialization

pub fn element_to_value(elt: &Element) -> Value {
    let mut dict = Map::new();
    if !elt.varias.is_empty() {
        dict.insert(
            "V".to_string(),
            Value::Array(elt.varias.iter().map(varia_to_value).collect()),
        );
    }
    if !elt.flames.is_empty() {
        dict.insert(
            "F".to_string(),
            Value::Array(elt.flames.iter().map(flame_to_value).collect()),
        );
    }
    if !elt.children.is_empty() {
        dict.insert(
            "children".to_string(),
            Value::Array(elt.children.iter().map(element_to_value).collect()),
        );
    }
    if let Some(ref title) = elt.title {
        dict.insert("title".to_string(), Value::String(title.clone()));
    }
    if let Some(ref stat) = elt.stat {
        dict.insert("stat".to_string(), stat_to_value(stat));
    }
    Value::Object(dict)
}

fn varia_to_value(varia: &Varia) -> Value {
    if varia.params.is_empty() {
        Value::String(varia.name.clone())
    } else {
        let mut dict = Map::new();
        dict.insert("name".to_string(), Value::String(varia.name.clone()));
        for (key, val) in varia.params.iter() {
            dict.insert(key.to_string(), number(val));
        }
        Value::Object(dict)
    }
}

fn flame_to_value(flame: &Flame) -> Value {
    let mut dict = Map::new();
    dict.insert("A".to_string(), affine_to_value(&flame.affine));
    dict.insert(
        "B".to_string(),
        Value::Array(flame.blend.iter().map(|&b| number(b)).collect()),
    );
    dict.insert("C".to_string(), number(flame.color));
    Value::Object(dict)
}

fn affine_to_value(affine: &Affine) -> Value {
    let mut dict = Map::new();
    match *affine {
        Affine::Rotation { angle } => {
            dict.insert("angle".to_string(), number(angle));
        }
        Affine::Translation { tx, ty } => {
            dict.insert("tx".to_string(), number(tx));
            dict.insert("ty".to_string(), number(ty));
        }
        Affine::Scale { sx, sy } => {
            dict.insert("sx".to_string(), number(sx));
            dict.insert("sy".to_string(), number(sy));
        }
        Affine::Skew { skx, sky } => {
            dict.insert("skx".to_string(), number(skx));
            dict.insert("sky".to_string(), number(sky));
        }
        Affine::Matrix(m) => {
            dict.insert("a".to_string(), number(m.a));
            dict.insert("b".to_string(), number(m.b));
            dict.insert("c".to_string(), number(m.c));
            dict.insert("d".to_string(), number(m.d));
            dict.insert("tx".to_string(), number(m.tx));
            dict.insert("ty".to_string(), number(m.ty));
        }
        Affine::Composite(ref members) => {
            return Value::Array(members.iter().map(affine_to_value).collect());
        }
    }
    Value::Object(dict)
}

fn stat_to_value(stat: &Stat) -> Value {
    let mut dict = Map::new();
    dict.insert("x".to_string(), span_to_value(&stat.x));
    dict.insert("y".to_string(), span_to_value(&stat.y));
    dict.insert("v".to_string(), span_to_value(&stat.v));
    Value::Object(dict)
}

fn span_to_value(span: &Span) -> Value {
    let mut dict = Map::new();
    dict.insert("min".to_string(), number(span.min));
    dict.insert("max".to_string(), number(span.max));
    Value::Object(dict)
}

fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
