//! Declarative argument validation for builtins.
//!
//! A builtin describes each expected slot (accepted kinds, optional,
//! var-args) and `parse` hands back the matched values or a uniform
//! `type mismatch` / `not enough arguments` message for the caller to
//! wrap into an error value.

use smallvec::SmallVec;

use crate::value::{Kind, Value};

/// One declared argument slot. An empty kind list accepts any value.
#[derive(Debug, Clone, Copy)]
pub struct ArgSlot {
    kinds: &'static [Kind],
    optional: bool,
    var_args: bool,
}

impl ArgSlot {
    #[must_use]
    pub fn required(kinds: &'static [Kind]) -> Self {
        Self {
            kinds,
            optional: false,
            var_args: false,
        }
    }

    #[must_use]
    pub fn optional(kinds: &'static [Kind]) -> Self {
        Self {
            kinds,
            optional: true,
            var_args: false,
        }
    }

    #[must_use]
    pub fn any() -> Self {
        Self::required(&[])
    }

    #[must_use]
    pub fn any_optional() -> Self {
        Self::optional(&[])
    }

    #[must_use]
    pub fn var_args(kinds: &'static [Kind]) -> Self {
        Self {
            kinds,
            optional: false,
            var_args: true,
        }
    }

    #[must_use]
    pub fn any_var_args() -> Self {
        Self::var_args(&[])
    }

    fn accepts(&self, value: &Value) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&value.kind())
    }

    fn expected(&self) -> String {
        if self.kinds.is_empty() {
            "ANY".to_owned()
        } else {
            self.kinds
                .iter()
                .map(|kind| kind.to_string())
                .collect::<Vec<_>>()
                .join("/")
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArgError {
    pub message: String,
}

/// Parsed slots in declaration order. A `None` entry is an optional slot
/// the caller did not fill; var-args produce one entry per extra value.
pub type ParsedArgs<'a> = SmallVec<[Option<&'a Value>; 4]>;

#[derive(Debug, Clone)]
pub struct ArgParser {
    slots: SmallVec<[ArgSlot; 4]>,
}

impl ArgParser {
    #[must_use]
    pub fn new(slots: impl IntoIterator<Item = ArgSlot>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }

    pub fn parse<'a>(&self, args: &'a [Value]) -> Result<ParsedArgs<'a>, ArgError> {
        let mut parsed = ParsedArgs::new();

        for (index, slot) in self.slots.iter().enumerate() {
            if slot.var_args {
                for value in &args[index.min(args.len())..] {
                    if !slot.accepts(value) {
                        return Err(ArgError {
                            message: format!("type mismatch. expected={}, got={}", slot.expected(), value.kind()),
                        });
                    }
                    parsed.push(Some(value));
                }
                return Ok(parsed);
            }

            let Some(value) = args.get(index) else {
                if slot.optional {
                    parsed.push(None);
                    break;
                }
                return Err(ArgError {
                    message: format!(
                        "not enough arguments passed in. expected={}, got={}",
                        self.slots.len(),
                        args.len()
                    ),
                });
            };

            if !slot.accepts(value) {
                return Err(ArgError {
                    message: format!("type mismatch. expected={}, got={}", slot.expected(), value.kind()),
                });
            }
            parsed.push(Some(value));
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_slot_matches_kind() {
        let parser = ArgParser::new([ArgSlot::required(&[Kind::Integer])]);
        let args = [Value::Integer(3.0)];
        let parsed = parser.parse(&args).unwrap();
        assert!(matches!(parsed[0], Some(Value::Integer(v)) if *v == 3.0));
    }

    #[test]
    fn missing_required_slot_reports_count() {
        let parser = ArgParser::new([ArgSlot::required(&[Kind::Integer])]);
        let err = parser.parse(&[]).unwrap_err();
        assert_eq!(err.message, "not enough arguments passed in. expected=1, got=0");
    }

    #[test]
    fn kind_mismatch_reports_both_sides() {
        let parser = ArgParser::new([ArgSlot::required(&[Kind::Integer])]);
        let args = [Value::string("nope")];
        let err = parser.parse(&args).unwrap_err();
        assert_eq!(err.message, "type mismatch. expected=INTEGER, got=STRING");
    }

    #[test]
    fn optional_slot_may_be_absent() {
        let parser = ArgParser::new([ArgSlot::optional(&[Kind::Integer])]);
        let parsed = parser.parse(&[]).unwrap();
        assert!(parsed[0].is_none());
    }

    #[test]
    fn var_args_collect_the_rest() {
        let parser = ArgParser::new([ArgSlot::any(), ArgSlot::any_var_args()]);
        let args = [Value::Integer(1.0), Value::Integer(2.0), Value::Integer(3.0)];
        let parsed = parser.parse(&args).unwrap();
        assert_eq!(parsed.len(), 3);
    }
}
