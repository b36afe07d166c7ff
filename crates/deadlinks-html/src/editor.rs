use std::cell::RefCell;

use deadlinks_core::annotate::Annotation;
use deadlinks_core::error::AppError;
use deadlinks_core::traits::MarkupEditor;
use lol_html::html_content::{ContentType, Element};
use lol_html::{HandlerResult, HtmlRewriter, Settings, element};

/// Markup editor backed by the lol_html streaming rewriter.
///
/// Candidate elements are `<a>` and `<object>` tags carrying an `href`
/// attribute. Enumeration and annotation walk the document with the same
/// selectors, so positions line up between the two passes. A document where
/// every annotation slot is `None` passes through byte-identical.
#[derive(Debug, Clone, Default)]
pub struct LolHtmlEditor;

impl LolHtmlEditor {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupEditor for LolHtmlEditor {
    fn links(&self, html: &str) -> Result<Vec<String>, AppError> {
        let links = RefCell::new(Vec::new());

        {
            let collect = |el: &mut Element| -> HandlerResult {
                if let Some(href) = el.get_attribute("href") {
                    links.borrow_mut().push(href);
                }
                Ok(())
            };
            let mut rewriter = HtmlRewriter::new(
                Settings {
                    element_content_handlers: vec![
                        element!("a[href]", collect),
                        element!("object[href]", collect),
                    ],
                    ..Settings::new()
                },
                |_: &[u8]| {},
            );
            rewriter
                .write(html.as_bytes())
                .map_err(|e| AppError::MarkupError(e.to_string()))?;
            rewriter
                .end()
                .map_err(|e| AppError::MarkupError(e.to_string()))?;
        }

        Ok(links.into_inner())
    }

    fn annotate(
        &self,
        html: &str,
        annotations: &[Option<Annotation>],
    ) -> Result<String, AppError> {
        let position = RefCell::new(0usize);
        let mut output = Vec::with_capacity(html.len());

        {
            let edit = |el: &mut Element| -> HandlerResult {
                let idx = *position.borrow();
                *position.borrow_mut() += 1;
                if let Some(Some(annotation)) = annotations.get(idx) {
                    apply(el, annotation)?;
                }
                Ok(())
            };
            let mut rewriter = HtmlRewriter::new(
                Settings {
                    element_content_handlers: vec![
                        element!("a[href]", edit),
                        element!("object[href]", edit),
                    ],
                    ..Settings::new()
                },
                |chunk: &[u8]| output.extend_from_slice(chunk),
            );
            rewriter
                .write(html.as_bytes())
                .map_err(|e| AppError::MarkupError(e.to_string()))?;
            rewriter
                .end()
                .map_err(|e| AppError::MarkupError(e.to_string()))?;
        }

        String::from_utf8(output).map_err(|e| AppError::MarkupError(e.to_string()))
    }
}

/// Apply one annotation to its element: append classes to the existing
/// class attribute, replace the href, insert the badge after the element.
fn apply(el: &mut Element, annotation: &Annotation) -> HandlerResult {
    if !annotation.classes.is_empty() {
        let mut class = el.get_attribute("class").unwrap_or_default();
        for name in &annotation.classes {
            if !class.is_empty() {
                class.push(' ');
            }
            class.push_str(name);
        }
        el.set_attribute("class", &class)?;
    }

    if let Some(href) = &annotation.href {
        el.set_attribute("href", href)?;
    }

    if let Some(badge) = &annotation.badge {
        el.after(&badge.to_html(), ContentType::Html);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadlinks_core::annotate::{access_error, connection_error};
    use deadlinks_core::options::CheckOptions;

    fn editor() -> LolHtmlEditor {
        LolHtmlEditor::new()
    }

    #[test]
    fn test_links_in_document_order() {
        let html = r#"
            <p><a href="http://one.example.com">one</a></p>
            <object href="http://two.example.com"></object>
            <div><a href="/three">three</a></div>
        "#;
        let links = editor().links(html).unwrap();
        assert_eq!(
            links,
            vec!["http://one.example.com", "http://two.example.com", "/three"]
        );
    }

    #[test]
    fn test_anchors_without_href_skipped() {
        let html = r#"<a name="top">top</a><a href="http://example.com">x</a>"#;
        let links = editor().links(html).unwrap();
        assert_eq!(links, vec!["http://example.com"]);
    }

    #[test]
    fn test_passthrough_is_byte_identical() {
        let html = "<P CLASS='odd'><a href=\"http://example.com\">x</a><br>&amp;</P>";
        let out = editor().annotate(html, &[None]).unwrap();
        assert_eq!(out, html);
    }

    #[test]
    fn test_classes_appended_preserving_existing() {
        let opts = CheckOptions {
            classes: vec!["disabled".into(), "dead".into()],
            archive: false,
            ..CheckOptions::default()
        };
        let html = r#"<a class="external" href="http://example.com">x</a>"#;
        let annotation = access_error("http://example.com", 404, &opts);
        let out = editor().annotate(html, &[Some(annotation)]).unwrap();
        assert_eq!(
            out,
            r#"<a class="external disabled dead" href="http://example.com">x</a>"#
        );
    }

    #[test]
    fn test_href_rewritten_to_archive() {
        let opts = CheckOptions::default();
        let html = r#"<a href="http://example.com/gone">x</a>"#;
        let annotation = connection_error("http://example.com/gone", &opts);
        let out = editor().annotate(html, &[Some(annotation)]).unwrap();
        assert_eq!(
            out,
            r#"<a href="http://web.archive.org/web/*/http://example.com/gone">x</a>"#
        );
    }

    #[test]
    fn test_badge_inserted_after_anchor() {
        let opts = CheckOptions {
            labels: true,
            archive: false,
            ..CheckOptions::default()
        };
        let html = r#"<p><a href="http://example.com">x</a> trailing</p>"#;
        let annotation = access_error("http://example.com", 404, &opts);
        let out = editor().annotate(html, &[Some(annotation)]).unwrap();
        assert_eq!(
            out,
            concat!(
                r#"<p><a href="http://example.com">x</a>"#,
                r#"<span class="label label-warning">404</span> trailing</p>"#
            )
        );
    }

    #[test]
    fn test_only_the_flagged_anchor_changes() {
        let opts = CheckOptions {
            labels: true,
            archive: false,
            classes: vec!["dead".into()],
            ..CheckOptions::default()
        };
        let html = concat!(
            r#"<a href="http://ok.example.com">ok</a>"#,
            r#"<a href="http://gone.example.com">gone</a>"#,
        );
        let annotation = connection_error("http://gone.example.com", &opts);
        let out = editor().annotate(html, &[None, Some(annotation)]).unwrap();
        // A freshly added class attribute lands at the end of the start tag.
        assert_eq!(
            out,
            concat!(
                r#"<a href="http://ok.example.com">ok</a>"#,
                r#"<a href="http://gone.example.com" class="dead">gone</a>"#,
                r#"<span class="label label-danger">not available</span>"#,
            )
        );
    }
}
