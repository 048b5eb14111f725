use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use roxmltree::{Document, Node, ParsingOptions};
use tracing::{debug, warn};

use crate::config::{Credentials, ResolvedConfig};
use crate::domain::SampleId;
use crate::error::{SampleError, WebinError};
use crate::reference::{Attribute, Sample};
use crate::retry::RetryPolicy;

pub const SERVICE_NAME: &str = "SampleXml";

pub trait SampleXmlClient: Send + Sync {
    /// Raw sample XML as returned by the service.
    fn fetch_sample_xml(&self, id: &SampleId) -> Result<String, SampleError>;

    fn get_sample(&self, id: &SampleId) -> Result<Sample, WebinError> {
        let xml = self
            .fetch_sample_xml(id)
            .map_err(|err| WebinError::sample_service(id.as_str(), err))?;
        if xml.trim().is_empty() {
            return Err(WebinError::sample_service(
                id.as_str(),
                SampleError::EmptyResponse,
            ));
        }
        parse_sample(id.as_str(), &xml)
    }
}

#[derive(Clone)]
pub struct SampleXmlHttpClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
    retry: RetryPolicy,
}

impl SampleXmlHttpClient {
    pub fn new(config: &ResolvedConfig) -> Result<Self, WebinError> {
        let credentials = config
            .credentials
            .clone()
            .ok_or(WebinError::MissingCredentials)?;
        let base_url = Url::parse(&config.base_uri)
            .map_err(|err| WebinError::InvalidBaseUri(format!("{}: {err}", config.base_uri)))?;
        if base_url.cannot_be_a_base() {
            return Err(WebinError::InvalidBaseUri(config.base_uri.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("webin-sample/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| WebinError::WebinHttp(err.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|err| WebinError::WebinHttp(err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            credentials,
            retry: config.retry,
        })
    }

    pub fn sample_url(&self, id: &SampleId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["samples", id.as_str()]);
        }
        url
    }

    fn get_once(&self, url: &Url) -> Result<String, SampleError> {
        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "sample XML request failed".to_string());
            if status.is_server_error() {
                return Err(SampleError::Server {
                    status: code,
                    message,
                });
            }
            return Err(SampleError::Status {
                status: code,
                message,
            });
        }
        response
            .text()
            .map_err(|err| SampleError::Unreachable(err.to_string()))
    }
}

impl SampleXmlClient for SampleXmlHttpClient {
    fn fetch_sample_xml(&self, id: &SampleId) -> Result<String, SampleError> {
        let url = self.sample_url(id);
        debug!(%url, "fetching sample xml");
        self.retry.execute(
            || self.get_once(&url),
            |ctx| {
                warn!(
                    attempt = ctx.attempt,
                    max_attempts = ctx.max_attempts,
                    error = %ctx.error,
                    "Retrying sample xml retrieval from server."
                )
            },
            SampleError::is_transient,
        )
    }
}

fn classify_send_error(err: reqwest::Error) -> SampleError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        SampleError::Unreachable(err.to_string())
    } else {
        SampleError::Request(err.to_string())
    }
}

/// Maps sample XML into a [`Sample`]. Every failure is reported as
/// [`WebinError::SampleServiceValidation`] for `sample_id`.
pub fn parse_sample(sample_id: &str, xml: &str) -> Result<Sample, WebinError> {
    let sample = map_sample(xml).map_err(|err| WebinError::sample_service(sample_id, err))?;
    debug!(
        sample_id,
        attributes = sample.attributes.len(),
        "parsed sample xml"
    );
    Ok(sample)
}

fn map_sample(xml: &str) -> Result<Sample, SampleError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)?;
    let mut sample = Sample::default();

    if let Some(element) = first_element(doc.root(), "SAMPLE") {
        sample.name = element.attribute("alias").unwrap_or_default().to_string();
    }

    if let Some(element) = first_element(doc.root(), "SAMPLE_NAME") {
        if let Some(taxon) = first_element(element, "TAXON_ID") {
            let value = text_content(taxon);
            let tax_id = value
                .parse::<i32>()
                .map_err(|source| SampleError::InvalidTaxId {
                    value: value.clone(),
                    source,
                })?;
            sample.tax_id = Some(tax_id);
        }
        sample.organism = first_element(element, "SCIENTIFIC_NAME").map(text_content);
    }

    for element in elements(doc.root(), "SAMPLE_ATTRIBUTE") {
        // TAG is mandatory; VALUE and UNITS are not.
        let tag = first_element(element, "TAG")
            .map(text_content)
            .ok_or(SampleError::MissingTag)?;
        let value = first_element(element, "VALUE").map(text_content);
        let units = first_element(element, "UNITS").map(text_content);
        sample.add_attribute(Attribute::new(tag, value, None, units, None));
    }

    Ok(sample)
}

/// Descendant elements whose qualified name is `name`, in document order,
/// excluding `node`. Prefixed elements such as `x:SAMPLE` never match.
fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants().skip(1).filter(move |child| {
        child.is_element() && child.tag_name().name() == name && is_unprefixed(*child)
    })
}

fn is_unprefixed(node: Node<'_, '_>) -> bool {
    node.tag_name().namespace() == node.lookup_namespace_uri(None)
}

fn first_element<'a, 'input>(node: Node<'a, 'input>, name: &'a str) -> Option<Node<'a, 'input>> {
    elements(node, name).next()
}

fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_joins_nested_text() {
        let doc = Document::parse("<TAG>collection<b>_</b>date</TAG>").unwrap();
        assert_eq!(text_content(doc.root_element()), "collection_date");
    }

    #[test]
    fn elements_skip_the_starting_node() {
        let doc = Document::parse("<SAMPLE><SAMPLE alias=\"inner\"/></SAMPLE>").unwrap();
        let inner = elements(doc.root_element(), "SAMPLE").collect::<Vec<_>>();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].attribute("alias"), Some("inner"));
    }
}
