use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

const ENVELOPE_TAG: &[u8] = b"Envelope";
const RETURN_TAG: &[u8] = b"return";

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error("response has no root element")]
    NoRootElement,

    #[error("response root is <{0}>, not a SOAP envelope")]
    NotEnvelope(String),

    #[error("response ends with {0} element(s) still open")]
    Unclosed(usize),

    #[error("content outside the root element")]
    ContentOutsideRoot,
}

/// Find the first `<return>` element anywhere in a SOAP response and return its text.
///
/// `Ok(None)` when no such element exists, `Ok(Some(""))` when it is empty. Entities
/// and CDATA sections are decoded; nested elements are skipped but their text kept.
/// The whole document is read, so anything that is not a single well-formed SOAP
/// envelope is an error.
pub fn find_return(xml: &str) -> Result<Option<String>, ResponseError> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut found: Option<String> = None;
    // depth and text of the first <return> while we are inside it
    let mut capture: Option<(usize, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                if depth == 0 {
                    check_root(&mut root_seen, name.as_ref())?;
                }
                depth += 1;
                if found.is_none() && capture.is_none() && name.as_ref() == RETURN_TAG {
                    capture = Some((depth, String::new()));
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                if depth == 0 {
                    check_root(&mut root_seen, name.as_ref())?;
                }
                if found.is_none() && capture.is_none() && name.as_ref() == RETURN_TAG {
                    found = Some(String::new());
                }
            }
            Event::End(_) => {
                if matches!(capture, Some((at, _)) if at == depth) {
                    found = capture.take().map(|(_, text)| text);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) => match capture.as_mut() {
                Some((_, text)) => text.push_str(&t.unescape()?),
                None if depth == 0 && t.iter().any(|b| !b.is_ascii_whitespace()) => {
                    return Err(ResponseError::ContentOutsideRoot);
                }
                None => {}
            },
            Event::CData(c) => match capture.as_mut() {
                Some((_, text)) => text.push_str(&String::from_utf8_lossy(&c)),
                None if depth == 0 => return Err(ResponseError::ContentOutsideRoot),
                None => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(ResponseError::NoRootElement);
    }
    if depth != 0 {
        return Err(ResponseError::Unclosed(depth));
    }

    Ok(found)
}

fn check_root(root_seen: &mut bool, name: &[u8]) -> Result<(), ResponseError> {
    if *root_seen {
        return Err(ResponseError::ContentOutsideRoot);
    }
    if name != ENVELOPE_TAG {
        return Err(ResponseError::NotEnvelope(
            String::from_utf8_lossy(name).into_owned(),
        ));
    }
    *root_seen = true;

    Ok(())
}
