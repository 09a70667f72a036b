//! # STEP Physical File Parser
//!
//! Parses the ISO-10303-21 clear-text encoding used by IFC files into an
//! ordered table of entity instances. The parser only understands the file
//! structure (header, data sections, instances and parameter values); the
//! meaning of IFC entities is handled in [`super::ifc`].
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::model::step::parse_step;
//!
//! let source = "ISO-10303-21;
//! HEADER;
//! FILE_SCHEMA(('IFC4'));
//! ENDSEC;
//! DATA;
//! #1=IFCRECTANGLEPROFILEDEF(.AREA.,'300x600',$,300.,600.);
//! ENDSEC;
//! END-ISO-10303-21;";
//!
//! let file = parse_step(source).unwrap();
//! let profile = file.get(1).unwrap();
//! assert_eq!(profile.keyword, "IFCRECTANGLEPROFILEDEF");
//! assert_eq!(profile.real(3), Some(300.0));
//! assert_eq!(file.schema(), Some("IFC4"));
//! ```

use indexmap::IndexMap;
use log::{debug, warn};
use thiserror::Error;
use winnow::{
    ascii::{digit0, digit1, multispace1},
    combinator::{alt, cut_err, delimited, fail, opt, preceded, repeat, separated, terminated},
    error::StrContext,
    token::{none_of, one_of, take_until, take_while},
    ModalResult, Parser,
};

/// A parameter value of an entity instance
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// `$`: value not provided
    Null,
    /// `*`: value derived from other attributes
    Derived,
    /// `#123`
    Reference(u64),
    String(String),
    /// `.LENGTHUNIT.`
    Enumeration(String),
    Integer(i64),
    Real(f64),
    /// Value wrapped in a defined type, e.g. `IFCLABEL('B1')`
    Typed(String, Box<Parameter>),
    List(Vec<Parameter>),
}

impl Parameter {
    pub fn is_null(&self) -> bool {
        matches!(self, Parameter::Null)
    }

    pub fn as_reference(&self) -> Option<u64> {
        match self {
            Parameter::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// String content, looking through a typed wrapper
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Parameter::String(s) => Some(s),
            Parameter::Typed(_, inner) => inner.as_str(),
            _ => None,
        }
    }

    /// Numeric value, looking through a typed wrapper
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Parameter::Real(v) => Some(*v),
            Parameter::Integer(v) => Some(*v as f64),
            Parameter::Typed(_, inner) => inner.as_f64(),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&str> {
        match self {
            Parameter::Enumeration(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Parameter]> {
        match self {
            Parameter::List(items) => Some(items),
            _ => None,
        }
    }
}

/// One simple entity instance: `#id=KEYWORD(params);`
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Upper-case entity name, e.g. `IFCBEAM`
    pub keyword: String,
    pub params: Vec<Parameter>,
}

impl Entity {
    /// Parameter at `index`; `None` when absent or `$`
    pub fn param(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index).filter(|p| !p.is_null())
    }

    pub fn string(&self, index: usize) -> Option<&str> {
        self.param(index)?.as_str()
    }

    pub fn real(&self, index: usize) -> Option<f64> {
        self.param(index)?.as_f64()
    }

    pub fn reference(&self, index: usize) -> Option<u64> {
        self.param(index)?.as_reference()
    }

    pub fn enumeration(&self, index: usize) -> Option<&str> {
        self.param(index)?.as_enumeration()
    }

    pub fn list(&self, index: usize) -> Option<&[Parameter]> {
        self.param(index)?.as_list()
    }
}

/// Parsed exchange file
#[derive(Debug, Clone, Default)]
pub struct StepFile {
    schema: Option<String>,
    entities: IndexMap<u64, Entity>,
}

impl StepFile {
    /// First schema named in the header's FILE_SCHEMA
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn get(&self, id: u64) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Entity behind a reference parameter
    pub fn resolve(&self, param: &Parameter) -> Option<&Entity> {
        self.get(param.as_reference()?)
    }

    /// All instances in file order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Entity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    /// Instances with the given keyword, in file order
    pub fn by_keyword<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = (u64, &'a Entity)> {
        self.iter().filter(move |(_, e)| e.keyword == keyword)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Syntax error in a STEP file
#[derive(Debug, Clone, PartialEq, Error)]
#[error("syntax error at line {line}, column {column}: {message}")]
pub struct StepError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl StepError {
    fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let before = &source[..offset.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
            + 1;
        StepError {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Parse a complete exchange file.
///
/// Complex (multi-record) instances are skipped; duplicate instance ids keep
/// the last definition.
pub fn parse_step(source: &str) -> Result<StepFile, StepError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let (header, sections) = exchange_file.parse(source).map_err(|e| {
        let message = e.inner().to_string();
        let message = if message.is_empty() {
            "unexpected input".to_string()
        } else {
            message.replace('\n', "; ")
        };
        StepError::at(source, e.offset(), message)
    })?;

    let schema = header
        .iter()
        .find(|(keyword, _)| keyword == "FILE_SCHEMA")
        .and_then(|(_, params)| params.first()?.as_list()?.first()?.as_str().map(str::to_string));

    let mut entities = IndexMap::new();
    let mut skipped = 0usize;
    for (id, instance) in sections.into_iter().flatten() {
        match instance {
            Some(entity) => {
                if entities.insert(id, entity).is_some() {
                    warn!(id; "Duplicate instance id, keeping the last definition");
                }
            }
            None => skipped += 1,
        }
    }

    debug!(
        entities = entities.len(),
        complex_skipped = skipped;
        "Parsed STEP data"
    );

    Ok(StepFile { schema, entities })
}

type Record = (String, Vec<Parameter>);

/// Deepest nesting of lists and typed values inside one instance
const MAX_PARAMETER_DEPTH: usize = 64;

fn exchange_file(input: &mut &str) -> ModalResult<(Vec<Record>, Vec<Vec<(u64, Option<Entity>)>>)> {
    (ws, "ISO-10303-21", ws, ';')
        .context(StrContext::Label("file start `ISO-10303-21;`"))
        .parse_next(input)?;
    let header = header_section.parse_next(input)?;
    let sections = repeat(1.., data_section).parse_next(input)?;
    (ws, "END-ISO-10303-21", ws, ';', ws)
        .context(StrContext::Label("file end `END-ISO-10303-21;`"))
        .parse_next(input)?;
    Ok((header, sections))
}

fn header_section(input: &mut &str) -> ModalResult<Vec<Record>> {
    delimited(
        (ws, "HEADER", ws, ';'),
        repeat(0.., terminated(preceded(ws, record), (ws, ';'))),
        (ws, "ENDSEC", ws, ';'),
    )
    .context(StrContext::Label("header section"))
    .parse_next(input)
}

fn data_section(input: &mut &str) -> ModalResult<Vec<(u64, Option<Entity>)>> {
    preceded(
        (ws, "DATA", ws, opt(|i: &mut &str| parameter_list(i, 0)), ws, ';'),
        cut_err(terminated(
            repeat(0.., preceded(ws, instance)),
            (ws, "ENDSEC", ws, ';'),
        ))
        .context(StrContext::Label("data section")),
    )
    .parse_next(input)
}

/// `#id=KEYWORD(...);` or complex `#id=(A(...)B(...));`
fn instance(input: &mut &str) -> ModalResult<(u64, Option<Entity>)> {
    let id = preceded('#', digit1.try_map(|d: &str| d.parse::<u64>())).parse_next(input)?;
    (ws, '=', ws).parse_next(input)?;

    let entity = cut_err(alt((
        record.map(|(keyword, params)| Some(Entity { keyword, params })),
        delimited('(', repeat(1.., preceded(ws, record)), (ws, ')'))
            .map(|_: Vec<Record>| None),
    )))
    .context(StrContext::Label("entity instance"))
    .parse_next(input)?;

    cut_err((ws, ';'))
        .context(StrContext::Expected(';'.into()))
        .parse_next(input)?;
    Ok((id, entity))
}

fn record(input: &mut &str) -> ModalResult<Record> {
    (keyword, preceded(ws, |i: &mut &str| parameter_list(i, 0)))
        .map(|(keyword, params): (&str, _)| (keyword.to_ascii_uppercase(), params))
        .parse_next(input)
}

fn keyword<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '!'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// `depth` counts enclosing lists and typed values
fn parameter_list(input: &mut &str, depth: usize) -> ModalResult<Vec<Parameter>> {
    '('.parse_next(input)?;
    nesting_guard(input, depth)?;
    terminated(
        separated(0.., |i: &mut &str| parameter(i, depth), (ws, ',')),
        (ws, ')'),
    )
    .parse_next(input)
}

fn parameter(input: &mut &str, depth: usize) -> ModalResult<Parameter> {
    preceded(
        ws,
        alt((
            '$'.value(Parameter::Null),
            '*'.value(Parameter::Derived),
            preceded('#', digit1.try_map(|d: &str| d.parse::<u64>())).map(Parameter::Reference),
            string.map(Parameter::String),
            delimited('.', take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_'), '.')
                .map(|e: &str| Parameter::Enumeration(e.to_string())),
            (|i: &mut &str| parameter_list(i, depth + 1)).map(Parameter::List),
            |i: &mut &str| typed(i, depth + 1),
            number,
        )),
    )
    .parse_next(input)
}

fn typed(input: &mut &str, depth: usize) -> ModalResult<Parameter> {
    let name = terminated(keyword, (ws, '(')).parse_next(input)?;
    nesting_guard(input, depth)?;
    let inner = terminated(|i: &mut &str| parameter(i, depth), (ws, ')')).parse_next(input)?;
    Ok(Parameter::Typed(name.to_ascii_uppercase(), Box::new(inner)))
}

/// Fails without backtracking once an opened list or typed value is nested too deep
fn nesting_guard(input: &mut &str, depth: usize) -> ModalResult<()> {
    if depth > MAX_PARAMETER_DEPTH {
        return cut_err(fail::<_, (), _>)
            .context(StrContext::Label("parameter nesting depth"))
            .parse_next(input);
    }
    Ok(())
}

fn number(input: &mut &str) -> ModalResult<Parameter> {
    (
        opt(one_of(['+', '-'])),
        digit1,
        opt(('.', digit0)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .verify_map(|text: &str| {
            if text.contains(['.', 'e', 'E']) {
                text.parse().ok().map(Parameter::Real)
            } else {
                text.parse().ok().map(Parameter::Integer)
            }
        })
        .parse_next(input)
}

/// `'...'` with `''` as an escaped quote; control directives are decoded
fn string(input: &mut &str) -> ModalResult<String> {
    preceded(
        '\'',
        cut_err(terminated(
            repeat(0.., alt(("''".value('\''), none_of('\'')))).fold(String::new, |mut s, c| {
                s.push(c);
                s
            }),
            '\'',
        ))
        .context(StrContext::Label("string literal")),
    )
    .map(|raw: String| decode_control_directives(&raw))
    .parse_next(input)
}

/// Whitespace and `/* ... */` comments
fn ws(input: &mut &str) -> ModalResult<()> {
    repeat(
        0..,
        alt((
            multispace1.void(),
            ("/*", take_until(0.., "*/"), "*/").void(),
        )),
    )
    .parse_next(input)
}

/// Decode `\X2\...\X0\`, `\X4\...\X0\`, `\X\hh`, `\S\c`, `\P?\` and `\\`.
fn decode_control_directives(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(after) = rest.strip_prefix("\\\\") {
            out.push('\\');
            rest = after;
        } else if let Some(after) = rest.strip_prefix("\\X2\\") {
            let end = after.find("\\X0\\").unwrap_or(after.len());
            let units: Vec<u16> = hex_groups(&after[..end], 4)
                .filter_map(|h| u16::from_str_radix(h, 16).ok())
                .collect();
            out.extend(
                char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
            );
            rest = after.get(end + 4..).unwrap_or("");
        } else if let Some(after) = rest.strip_prefix("\\X4\\") {
            let end = after.find("\\X0\\").unwrap_or(after.len());
            out.extend(
                hex_groups(&after[..end], 8)
                    .filter_map(|h| u32::from_str_radix(h, 16).ok())
                    .map(|cp| char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER)),
            );
            rest = after.get(end + 4..).unwrap_or("");
        } else if let Some(after) = rest.strip_prefix("\\X\\") {
            match after.get(..2).and_then(|h| u8::from_str_radix(h, 16).ok()) {
                Some(byte) => {
                    out.push(char::from(byte));
                    rest = &after[2..];
                }
                None => {
                    out.push_str("\\X\\");
                    rest = after;
                }
            }
        } else if let Some(after) = rest.strip_prefix("\\S\\") {
            let mut chars = after.chars();
            match chars.next() {
                Some(c) => {
                    out.push(char::from_u32(c as u32 + 128).unwrap_or(c));
                    rest = chars.as_str();
                }
                None => rest = after,
            }
        } else if let Some(after) = code_page_switch(rest) {
            rest = after;
        } else {
            out.push('\\');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Strip a `\P?\` code page switch, which has no visible content
fn code_page_switch(rest: &str) -> Option<&str> {
    let mut chars = rest.strip_prefix("\\P")?.chars();
    chars.next()?;
    chars.as_str().strip_prefix('\\')
}

fn hex_groups(hex: &str, width: usize) -> impl Iterator<Item = &str> {
    hex.as_bytes()
        .chunks(width)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(data: &str) -> String {
        format!(
            "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');\n\
             FILE_NAME('test.ifc','2024-05-01T10:00:00',(''),(''),'','','');\n\
             FILE_SCHEMA(('IFC2X3'));\nENDSEC;\nDATA;\n{data}\nENDSEC;\nEND-ISO-10303-21;\n"
        )
    }

    #[test]
    fn test_parses_header_schema() {
        let file = parse_step(&wrap("#1=IFCDIRECTION((1.,0.,0.));")).unwrap();
        assert_eq!(file.schema(), Some("IFC2X3"));
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn test_parameter_kinds() {
        let file = parse_step(&wrap(
            "#7=IFCBEAM('2O2Fr$t4X7Zf8NOew3FLOH',#2,'Beam 300x600',$,*,.T.,#9,'B-12',-4,1.E-05,IFCLABEL('x'),(#1,#2));",
        ))
        .unwrap();
        let beam = file.get(7).unwrap();

        assert_eq!(beam.keyword, "IFCBEAM");
        assert_eq!(beam.string(0), Some("2O2Fr$t4X7Zf8NOew3FLOH"));
        assert_eq!(beam.reference(1), Some(2));
        assert_eq!(beam.string(2), Some("Beam 300x600"));
        assert!(beam.param(3).is_none());
        assert_eq!(beam.params[4], Parameter::Derived);
        assert_eq!(beam.enumeration(5), Some("T"));
        assert_eq!(beam.params[8], Parameter::Integer(-4));
        assert_eq!(beam.real(9), Some(1.0e-5));
        assert_eq!(beam.string(10), Some("x"));
        assert_eq!(beam.list(11).map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_reals_without_fraction_digits() {
        let file = parse_step(&wrap("#1=IFCCARTESIANPOINT((0.,-150.,2.5E2));")).unwrap();
        let coords: Vec<f64> = file
            .get(1)
            .unwrap()
            .list(0)
            .unwrap()
            .iter()
            .filter_map(Parameter::as_f64)
            .collect();
        assert_eq!(coords, vec![0.0, -150.0, 250.0]);
    }

    #[test]
    fn test_string_escapes() {
        let file = parse_step(&wrap(
            "#1=IFCLABEL2('It''s 300\\X2\\00D7\\X0\\600 \\X\\E9 a\\\\b');",
        ))
        .unwrap();
        assert_eq!(file.get(1).unwrap().string(0), Some("It's 300×600 é a\\b"));
    }

    #[test]
    fn test_code_page_switch() {
        let file = parse_step(&wrap(
            "#1=IFCBEAM('\\PA\\300x600',$);\n#2=IFCBEAM('\\P\u{e9}300x600',$);",
        ))
        .unwrap();
        assert_eq!(file.get(1).unwrap().string(0), Some("300x600"));
        assert_eq!(file.get(2).unwrap().string(0), Some("\\P\u{e9}300x600"));
    }

    #[test]
    fn test_nesting_within_limit() {
        let depth = MAX_PARAMETER_DEPTH;
        let data = format!(
            "#1=IFCDIRECTION({}1.{});",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let file = parse_step(&wrap(&data)).unwrap();

        let mut param = &file.get(1).unwrap().params[0];
        let mut levels = 0;
        while let Parameter::List(items) = param {
            param = &items[0];
            levels += 1;
        }
        assert_eq!(levels, depth);
        assert_eq!(param, &Parameter::Real(1.0));
    }

    #[test]
    fn test_excessive_nesting_is_an_error() {
        let deep_list = format!(
            "#1=IFCDIRECTION({}1.{});",
            "(".repeat(50_000),
            ")".repeat(50_000)
        );
        assert!(parse_step(&wrap(&deep_list)).is_err());

        let deep_typed = format!(
            "#1=IFCPROPERTY({}1.{});",
            "IFCREAL(".repeat(1_000),
            ")".repeat(1_000)
        );
        assert!(parse_step(&wrap(&deep_typed)).is_err());
    }

    #[test]
    fn test_semicolon_inside_string() {
        let file = parse_step(&wrap("#1=IFCBEAMTYPE('a;b',$);\n#2=IFCBEAMTYPE('c',$);")).unwrap();
        assert_eq!(file.get(1).unwrap().string(0), Some("a;b"));
        assert_eq!(file.len(), 2);
    }

    #[test]
    fn test_comments_and_whitespace() {
        let file = parse_step(&wrap(
            "/* generated */\n#1 = IFCDIRECTION ( ( 1. , 0. ) ) ;\n/* trailing */",
        ))
        .unwrap();
        assert_eq!(file.get(1).unwrap().list(0).map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_complex_instance_is_skipped() {
        let file = parse_step(&wrap(
            "#1=(IFCNAMEDUNIT(*,.LENGTHUNIT.)IFCSIUNIT(.MILLI.,.METRE.));\n#2=IFCDIRECTION((1.,0.));",
        ))
        .unwrap();
        assert!(file.get(1).is_none());
        assert!(file.get(2).is_some());
    }

    #[test]
    fn test_by_keyword_preserves_file_order() {
        let file = parse_step(&wrap(
            "#30=IFCBEAM('c');\n#10=IFCCOLUMN('x');\n#20=IFCBEAM('a');",
        ))
        .unwrap();
        let ids: Vec<u64> = file.by_keyword("IFCBEAM").map(|(id, _)| id).collect();
        assert_eq!(ids, vec![30, 20]);
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err =
            parse_step(&wrap("#1=IFCDIRECTION((1.,0.));\n#2=IFCDIRECTION((1.,0.)) oops;"))
                .unwrap_err();
        // DATA; is line 7, the broken instance is on line 9
        assert_eq!(err.line, 9);
    }

    #[test]
    fn test_not_a_step_file() {
        assert!(parse_step("this is not an IFC file").is_err());
        assert!(parse_step("").is_err());
    }
}
