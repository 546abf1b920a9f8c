//! Display formatting of the read-back port state.

use crate::consts::PORT_MASK;
use crate::error::{invalid_format, Result};
use crate::gpio::PortPin;
use std::fmt;

/// Widest field a template may request.
const MAX_FIELD_WIDTH: usize = 1024;

/// How the port state is printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `0x` followed by four uppercase hex digits.
    #[default]
    Hex,
    /// `0b` followed by sixteen binary digits.
    Bin,
    /// A user template with one integer slot.
    Template(Template),
}

impl OutputFormat {
    /// `hex` and `bin` select the built-in formats; anything else is parsed as a template.
    pub fn parse(text: &str) -> Result<Self> {
        match text {
            "hex" => Ok(OutputFormat::Hex),
            "bin" => Ok(OutputFormat::Bin),
            _ => Template::parse(text).map(OutputFormat::Template),
        }
    }
}

/// Renders a read-back port state for display.
///
/// Inversion is applied first. A pin selector wins over `format` and prints
/// the single bit as `0` or `1`.
pub fn render(value: u16, pin: Option<PortPin>, invert: bool, format: &OutputFormat) -> String {
    let value = if invert { value ^ PORT_MASK } else { value };
    if let Some(pin) = pin {
        return ((value >> pin.number()) & 1).to_string();
    }
    match format {
        OutputFormat::Hex => format!("0x{:04X}", value),
        OutputFormat::Bin => format!("0b{:016b}", value),
        OutputFormat::Template(template) => template.render(value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign/prefix and the digits.
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Negative,
    Plus,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Decimal,
    LowerHex,
    UpperHex,
    Octal,
    Binary,
}

/// A parsed `{:...}` replacement field.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldSpec {
    fill: char,
    align: Align,
    sign: Sign,
    alternate: bool,
    width: usize,
    radix: Radix,
}

impl Default for FieldSpec {
    fn default() -> Self {
        FieldSpec {
            fill: ' ',
            align: Align::Right,
            sign: Sign::Negative,
            alternate: false,
            width: 0,
            radix: Radix::Decimal,
        }
    }
}

impl FieldSpec {
    /// Grammar: `[[fill]align][sign][#][0][width][type]`, type one of `d n x X o b`.
    fn parse(template: &str, spec: &str) -> Result<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let mut out = FieldSpec::default();
        let mut i = 0;

        let align_of = |c: char| match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::AfterSign),
            _ => None,
        };
        let mut explicit_align = false;
        let mut explicit_fill = false;
        if let Some(align) = chars.get(1).and_then(|&c| align_of(c)) {
            out.fill = chars[0];
            out.align = align;
            explicit_align = true;
            explicit_fill = true;
            i = 2;
        } else if let Some(align) = chars.first().and_then(|&c| align_of(c)) {
            out.align = align;
            explicit_align = true;
            i = 1;
        }

        match chars.get(i) {
            Some('+') => {
                out.sign = Sign::Plus;
                i += 1;
            }
            Some('-') => i += 1,
            Some(' ') => {
                out.sign = Sign::Space;
                i += 1;
            }
            _ => {}
        }
        if chars.get(i) == Some(&'#') {
            out.alternate = true;
            i += 1;
        }
        if chars.get(i) == Some(&'0') {
            if !explicit_fill {
                out.fill = '0';
            }
            if !explicit_align {
                out.align = Align::AfterSign;
            }
            i += 1;
        }

        let width_start = i;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if i > width_start {
            let width: String = chars[width_start..i].iter().collect();
            out.width = width
                .parse()
                .ok()
                .filter(|&w| w <= MAX_FIELD_WIDTH)
                .ok_or_else(|| invalid_format(template, "field width is too large"))?;
        }

        if let Some(&c) = chars.get(i) {
            out.radix = match c {
                'd' | 'n' => Radix::Decimal,
                'x' => Radix::LowerHex,
                'X' => Radix::UpperHex,
                'o' => Radix::Octal,
                'b' => Radix::Binary,
                other => {
                    return Err(invalid_format(
                        template,
                        format!("unsupported format type '{}'", other),
                    ))
                }
            };
            i += 1;
        }
        if i != chars.len() {
            return Err(invalid_format(
                template,
                format!("unsupported format spec '{}'", spec),
            ));
        }
        Ok(out)
    }

    fn apply(&self, value: u16) -> String {
        let (prefix, digits) = match self.radix {
            Radix::Decimal => ("", value.to_string()),
            Radix::LowerHex => ("0x", format!("{:x}", value)),
            Radix::UpperHex => ("0X", format!("{:X}", value)),
            Radix::Octal => ("0o", format!("{:o}", value)),
            Radix::Binary => ("0b", format!("{:b}", value)),
        };
        let sign = match self.sign {
            Sign::Negative => "",
            Sign::Plus => "+",
            Sign::Space => " ",
        };
        let prefix = if self.alternate { prefix } else { "" };

        let len = sign.len() + prefix.len() + digits.len();
        let pad = self.width.saturating_sub(len);
        let fill = |n: usize| self.fill.to_string().repeat(n);
        match self.align {
            Align::Left => format!("{}{}{}{}", sign, prefix, digits, fill(pad)),
            Align::Right => format!("{}{}{}{}", fill(pad), sign, prefix, digits),
            Align::Center => {
                let left = pad / 2;
                format!(
                    "{}{}{}{}{}",
                    fill(left),
                    sign,
                    prefix,
                    digits,
                    fill(pad - left)
                )
            }
            Align::AfterSign => format!("{}{}{}{}", sign, prefix, fill(pad), digits),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Value(FieldSpec),
}

/// A custom output template such as `"port={:04X}"`.
///
/// Placeholders are `{}` or `{0}` with an optional `:spec`; `{{` and `}}`
/// print literal braces. All placeholders refer to the same port value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    pieces: Vec<Piece>,
}

impl Template {
    pub fn parse(template: &str) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut auto_fields = 0usize;
        let mut manual_fields = 0usize;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '}' => return Err(invalid_format(template, "single '}' encountered")),
                '{' => {
                    let mut field = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => {
                                return Err(invalid_format(template, "nested fields are not supported"))
                            }
                            Some(ch) => field.push(ch),
                            None => return Err(invalid_format(template, "unclosed '{'")),
                        }
                    }
                    let (name, spec) = match field.split_once(':') {
                        Some((name, spec)) => (name, spec),
                        None => (field.as_str(), ""),
                    };
                    match name {
                        "" => auto_fields += 1,
                        "0" => manual_fields += 1,
                        other => {
                            return Err(invalid_format(
                                template,
                                format!("unknown field '{}' (only one value is available)", other),
                            ))
                        }
                    }
                    if auto_fields > 1 {
                        return Err(invalid_format(
                            template,
                            "only one value is available for '{}' fields",
                        ));
                    }
                    if auto_fields > 0 && manual_fields > 0 {
                        return Err(invalid_format(
                            template,
                            "cannot mix automatic and manual field numbering",
                        ));
                    }
                    if !text.is_empty() {
                        pieces.push(Piece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(Piece::Value(FieldSpec::parse(template, spec)?));
                }
                other => text.push(other),
            }
        }
        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }

        Ok(Template {
            source: template.to_string(),
            pieces,
        })
    }

    pub fn render(&self, value: u16) -> String {
        self.pieces
            .iter()
            .map(|piece| match piece {
                Piece::Text(text) => text.clone(),
                Piece::Value(spec) => spec.apply(value),
            })
            .collect()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Hex => f.write_str("hex"),
            OutputFormat::Bin => f.write_str("bin"),
            OutputFormat::Template(template) => fmt::Display::fmt(template, f),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
