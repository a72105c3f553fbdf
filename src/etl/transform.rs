//! Transformer trait and the per-record output stage

use crate::codec::{RecordEncoder, codec_for};
use crate::format::{Delimiter, FormatTag};
use crate::hooks::{BoundHooks, POST_SUFFIX, PRE_SUFFIX};
use crate::record::{Fragment, Record};
use eyre::{Result, WrapErr};

/// Transformer trait for turning input items into output items
///
/// A transformer may consume an item without producing output, and may do
/// work once before and once after a batch.
///
/// # Example
/// ```
/// use record_etl::etl::Transformer;
/// use eyre::Result;
///
/// struct SkipEmpty;
///
/// impl Transformer for SkipEmpty {
///     type Input = String;
///     type Output = String;
///
///     fn transform(&mut self, input: Self::Input) -> Result<Option<Self::Output>> {
///         Ok((!input.is_empty()).then_some(input))
///     }
/// }
///
/// let kept = SkipEmpty
///     .transform_many(vec!["a".into(), String::new(), "b".into()])
///     .unwrap();
/// assert_eq!(kept, vec!["a", "b"]);
/// ```
pub trait Transformer {
    /// Input item type
    type Input;

    /// Output item type after transformation
    type Output;

    /// Transform a single item; `None` consumes it without output
    ///
    /// # Errors
    /// Returns an error if transformation fails
    fn transform(&mut self, input: Self::Input) -> Result<Option<Self::Output>>;

    /// Runs once before the first item of a batch
    fn before(&mut self) -> Result<()> {
        Ok(())
    }

    /// Runs once after the last item of a batch
    fn after(&mut self) -> Result<()> {
        Ok(())
    }

    /// Transform a whole batch in order, stopping at the first failure
    fn transform_many(&mut self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        self.before()?;
        let mut outputs = Vec::with_capacity(inputs.len());
        for input in inputs {
            if let Some(output) = self.transform(input)? {
                outputs.push(output);
            }
        }
        self.after()?;
        Ok(outputs)
    }
}

/// Turns records into output fragments
///
/// With a bound hook every record goes through the hook and its output is
/// kept verbatim. Otherwise the target format's encoder serializes the
/// record; the target tag is resolved on the first record, so an unknown
/// format fails there and an empty batch never fails on it.
pub struct RecordTransformer {
    mode: Mode,
    position: usize,
}

enum Mode {
    Hook(BoundHooks),
    BuiltIn {
        target: FormatTag,
        delimiter: Delimiter,
        encoder: Option<Box<dyn RecordEncoder>>,
    },
}

impl RecordTransformer {
    /// Serialize with the target format's built-in rules
    pub fn built_in(target: FormatTag, delimiter: Delimiter) -> Self {
        Self {
            mode: Mode::BuiltIn {
                target,
                delimiter,
                encoder: None,
            },
            position: 0,
        }
    }

    /// Hand every record to a caller-supplied hook
    pub fn with_hooks(hooks: BoundHooks) -> Self {
        Self {
            mode: Mode::Hook(hooks),
            position: 0,
        }
    }

    pub fn uses_hook(&self) -> bool {
        matches!(self.mode, Mode::Hook(_))
    }
}

impl Transformer for RecordTransformer {
    type Input = Record;
    type Output = Fragment;

    fn before(&mut self) -> Result<()> {
        match &mut self.mode {
            Mode::Hook(hooks) => {
                let name = hooks.name().to_string();
                hooks
                    .before()
                    .wrap_err_with(|| format!("Hook '{name}{PRE_SUFFIX}' failed"))
            }
            Mode::BuiltIn { .. } => Ok(()),
        }
    }

    fn transform(&mut self, record: Self::Input) -> Result<Option<Self::Output>> {
        self.position += 1;
        let position = self.position;

        match &mut self.mode {
            Mode::Hook(hooks) => hooks.transform(&record).map(Some).wrap_err_with(|| {
                format!("Hook '{}' failed on record {}", hooks.name(), position)
            }),
            Mode::BuiltIn {
                target,
                delimiter,
                encoder,
            } => {
                let encoder = match encoder {
                    Some(encoder) => encoder,
                    slot @ None => {
                        let format = target.resolve()?;
                        log::debug!("Encoding records as {}", format);
                        slot.insert(codec_for(format).encoder(*delimiter))
                    }
                };
                Ok(encoder.encode(&record)?)
            }
        }
    }

    fn after(&mut self) -> Result<()> {
        match &mut self.mode {
            Mode::Hook(hooks) => {
                let name = hooks.name().to_string();
                hooks
                    .after()
                    .wrap_err_with(|| format!("Hook '{name}{POST_SUFFIX}' failed"))
            }
            Mode::BuiltIn { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtlError;
    use crate::format::Format;
    use crate::hooks::HookRegistry;
    use crate::record::{RecordSet, record_from_pairs};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample() -> RecordSet {
        vec![
            record_from_pairs([("a", "1"), ("b", "2")]),
            record_from_pairs([("a", "3"), ("b", "4")]),
        ]
    }

    #[test]
    fn test_built_in_csv() {
        let mut transformer = RecordTransformer::built_in(Format::Csv.into(), Delimiter::default());
        let fragments = transformer.transform_many(sample()).unwrap();
        assert_eq!(fragments, vec!["1;2", "3;4"]);
        assert!(!transformer.uses_hook());
    }

    #[test]
    fn test_built_in_xml_takes_names_from_first_record() {
        let mut records = vec![record_from_pairs([("a", "left"), ("b", "right")])];
        records.extend(sample());
        let mut transformer = RecordTransformer::built_in(Format::Xml.into(), Delimiter::default());
        let fragments = transformer.transform_many(records).unwrap();
        assert_eq!(fragments.len(), 2);
        assert!(fragments[1].contains("<left>3</left>"));
        assert!(fragments[1].contains("<right>4</right>"));
    }

    #[test]
    fn test_unknown_target_fails_on_first_record() {
        let mut transformer = RecordTransformer::built_in(FormatTag::new("YAML"), Delimiter::default());
        let err = transformer.transform_many(sample()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EtlError>(),
            Some(EtlError::UnsupportedFormat(tag)) if tag == "YAML"
        ));
    }

    #[test]
    fn test_unknown_target_with_no_records_is_fine() {
        let mut transformer = RecordTransformer::built_in(FormatTag::new("YAML"), Delimiter::default());
        assert!(transformer.transform_many(vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_hook_output_is_kept_verbatim() {
        let hooks = HookRegistry::new()
            .with_transform("tagged", |record| Ok(format!("<{}>\n", record["a"])))
            .resolve("tagged")
            .unwrap();
        let mut transformer = RecordTransformer::with_hooks(hooks);
        let fragments = transformer.transform_many(sample()).unwrap();
        assert_eq!(fragments, vec!["<\"1\">\n", "<\"3\">\n"]);
        assert!(transformer.uses_hook());
    }

    #[test]
    fn test_lifecycle_runs_once_around_the_loop() {
        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        let (pre, row, post) = (log.clone(), log.clone(), log.clone());
        let hooks = HookRegistry::new()
            .with_transform("t", move |record| {
                row.borrow_mut().push(format!("row {}", record["a"].as_str().unwrap_or("")));
                Ok(String::new())
            })
            .with_lifecycle("t_pre", move || {
                pre.borrow_mut().push("pre".into());
                Ok(())
            })
            .with_lifecycle("t_post", move || {
                post.borrow_mut().push("post".into());
                Ok(())
            })
            .resolve("t")
            .unwrap();

        let mut transformer = RecordTransformer::with_hooks(hooks);
        transformer.transform_many(sample()).unwrap();
        assert_eq!(*log.borrow(), vec!["pre", "row 1", "row 3", "post"]);
    }

    #[test]
    fn test_hook_failure_names_the_record() {
        let hooks = HookRegistry::new()
            .with_transform("picky", |record| {
                if record["a"] == "3" {
                    eyre::bail!("refusing 3");
                }
                Ok(String::new())
            })
            .resolve("picky")
            .unwrap();
        let mut transformer = RecordTransformer::with_hooks(hooks);
        let err = transformer.transform_many(sample()).unwrap_err();
        assert!(err.to_string().contains("record 2"));
    }
}
