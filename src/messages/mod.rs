//! Progress-message catalog and rendering.
//!
//! Every piece of progress text the estimator can produce lives here as a
//! template keyed by [`MessageId`]. Templates are seeded once, at catalog
//! construction, from the configured channel names; rendering substitutes
//! caller-supplied [`MessageVars`] and emission writes the rendered text to
//! stdout with an explicit flush, so output order always matches call order.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::config::ChannelMap;

/// Width of the initialization banner in characters.
const BANNER_WIDTH: usize = 93;

/// Identifiers for every message the estimator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Startup banner with the tool name and version.
    Initialize,
    /// The configured channel-name mapping, one `role : column` line each.
    Settings,
    /// A test point was added; takes the label.
    NewPoint,
    /// Flight-regime summary lines for a new test point; takes field pairs.
    PointInfo,
    /// Processing of one test point started; takes the label.
    Processing,
    /// Processing of one test point finished.
    Done,
}

/// Variables substituted into a message template.
#[derive(Debug, Clone)]
pub enum MessageVars {
    /// One value formatted into the template's placeholder.
    Scalar(String),
    /// Ordered record rendered as newline-joined `key : value` lines.
    Fields(Vec<(String, String)>),
}

/// Template storage plus rendering and ordered emission of progress text.
pub struct MessageCatalog {
    templates: HashMap<MessageId, String>,
}

impl MessageCatalog {
    /// Builds the catalog, seeding the settings template from `names`.
    pub fn new(names: &ChannelMap) -> Self {
        let border = "*".repeat(BANNER_WIDTH);
        let title = format!(
            "{:*^width$}",
            " Air Data System Self-Survey Calibration Pipeline ",
            width = BANNER_WIDTH
        );
        let version = format!(
            "{:*^width$}",
            format!(" Version {} ", crate::VERSION),
            width = BANNER_WIDTH
        );
        let initialize = format!("{border}\n{title}\n{version}\n{border}");

        let name_lines = names
            .iter()
            .map(|(role, column)| format!("{role} : {column}"))
            .collect::<Vec<_>>()
            .join("\n");
        let settings = format!(
            "\nAn air data survey estimator has been initialized \
             with the following DAS channel names:\n{name_lines}\n\n"
        );

        let mut templates = HashMap::new();
        templates.insert(MessageId::Initialize, initialize);
        templates.insert(MessageId::Settings, settings);
        templates.insert(
            MessageId::NewPoint,
            "Test point {} has been added:\n".to_string(),
        );
        templates.insert(MessageId::PointInfo, "{}\n\n".to_string());
        templates.insert(
            MessageId::Processing,
            "Processing test point {}...".to_string(),
        );
        templates.insert(MessageId::Done, "Done.\n".to_string());

        Self { templates }
    }

    /// Returns the raw template text for a message.
    pub fn template(&self, id: MessageId) -> &str {
        self.templates.get(&id).map(String::as_str).unwrap_or("")
    }

    /// Renders a message, substituting `vars` into the template placeholder.
    pub fn render(&self, id: MessageId, vars: Option<&MessageVars>) -> String {
        let template = self.template(id);
        match vars {
            None => template.to_string(),
            Some(MessageVars::Scalar(value)) => template.replacen("{}", value, 1),
            Some(MessageVars::Fields(fields)) => {
                let joined = fields
                    .iter()
                    .map(|(key, value)| format!("{key} : {value}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                template.replacen("{}", &joined, 1)
            }
        }
    }

    /// Renders a message and writes it to stdout, flushing immediately.
    pub fn emit(&self, id: MessageId, vars: Option<&MessageVars>) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let _ = self.write_to(&mut handle, id, vars);
    }

    /// Renders a message into any writer, flushing before returning.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        id: MessageId,
        vars: Option<&MessageVars>,
    ) -> io::Result<()> {
        write!(out, "{}", self.render(id, vars))?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MessageCatalog {
        let names = ChannelMap::from_pairs([
            ("total pressure", "ADC_QCIC"),
            ("static pressure", "ADC_PSIC"),
        ])
        .unwrap();
        MessageCatalog::new(&names)
    }

    #[test]
    fn test_render_plain_template() {
        assert_eq!(catalog().render(MessageId::Done, None), "Done.\n");
    }

    #[test]
    fn test_render_scalar_substitution() {
        let text = catalog().render(
            MessageId::Processing,
            Some(&MessageVars::Scalar("flight1".to_string())),
        );
        assert_eq!(text, "Processing test point flight1...");
    }

    #[test]
    fn test_render_fields_as_joined_lines() {
        let fields = MessageVars::Fields(vec![
            ("Min. speed".to_string(), "0.50 M".to_string()),
            ("Max. speed".to_string(), "0.62 M".to_string()),
        ]);
        let text = catalog().render(MessageId::PointInfo, Some(&fields));
        assert_eq!(text, "Min. speed : 0.50 M\nMax. speed : 0.62 M\n\n");
    }

    #[test]
    fn test_initialize_banner_shape() {
        let banner = catalog().render(MessageId::Initialize, None);

        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|line| line.len() == BANNER_WIDTH));
        assert!(lines[2].contains(crate::VERSION));
        assert!(!banner.ends_with('\n'));
    }

    #[test]
    fn test_settings_lists_channel_names_in_map_order() {
        let text = catalog().render(MessageId::Settings, None);

        let total = text.find("total pressure : ADC_QCIC").unwrap();
        let statics = text.find("static pressure : ADC_PSIC").unwrap();
        assert!(total < statics);
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_write_to_preserves_emission_order() {
        let catalog = catalog();
        let mut out: Vec<u8> = Vec::new();

        let label = MessageVars::Scalar("tp_02".to_string());
        catalog
            .write_to(&mut out, MessageId::Processing, Some(&label))
            .unwrap();
        catalog.write_to(&mut out, MessageId::Done, None).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Processing test point tp_02...Done.\n");
    }
}
