//! Blocking HTTP GET over libcurl easy handles.
//!
//! One handle per request, dropped before returning. Headers are collected per response so
//! that after redirects only the final response's headers are visible.

use crate::config::HttpConfig;
use crate::error::{BibdumpError, Result};
use std::cell::RefCell;
use std::time::Duration;

/// Transfer settings for a single request.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    /// Receive buffer size; bounds the size of each chunk handed to the write callback.
    pub buffer_size: usize,
    pub user_agent: Option<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        HttpOptions::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for HttpOptions {
    fn from(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
            buffer_size: cfg.chunk_size,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Status and header lines of the most recent response seen on a transfer.
#[derive(Debug, Clone, Default)]
pub struct ResponseHeaders {
    status: Option<u32>,
    lines: Vec<String>,
}

impl ResponseHeaders {
    /// Feed one raw header line. A status line starts a new response (redirect hop).
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            self.status = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse::<u32>().ok());
            self.lines.clear();
            return;
        }
        self.lines.push(line.to_string());
    }

    /// Feed one header line as received from the wire. Bytes that are not UTF-8 (raw
    /// Latin-1 filenames, say) are replaced rather than dropping the whole line.
    pub fn push_raw(&mut self, data: &[u8]) {
        self.push_line(&String::from_utf8_lossy(data));
    }

    pub fn status(&self) -> Option<u32> {
        self.status
    }

    /// First value of header `name` (case-insensitive), trimmed.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| {
            let (n, v) = line.split_once(':')?;
            n.trim().eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.get("content-disposition")
    }
}

fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

fn transport(url: &str, source: curl::Error) -> BibdumpError {
    BibdumpError::Transport {
        url: url.to_string(),
        source,
    }
}

fn new_easy(url: &str, opts: &HttpOptions) -> Result<curl::easy::Easy> {
    let mut easy = curl::easy::Easy::new();
    let configure = |easy: &mut curl::easy::Easy| -> std::result::Result<(), curl::Error> {
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(opts.connect_timeout)?;
        easy.timeout(opts.timeout)?;
        easy.buffer_size(opts.buffer_size)?;
        if let Some(ua) = &opts.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    };
    configure(&mut easy).map_err(|e| transport(url, e))?;
    Ok(easy)
}

/// Streams the body of `url` through `on_chunk`, one receive buffer at a time.
///
/// `on_chunk` sees the headers of the final response alongside each chunk and is only
/// called for 2xx responses. An error from it aborts the transfer and is returned as-is.
/// Returns the final response headers.
pub fn get_streaming<F>(url: &str, opts: &HttpOptions, mut on_chunk: F) -> Result<ResponseHeaders>
where
    F: FnMut(&ResponseHeaders, &[u8]) -> Result<()>,
{
    let mut easy = new_easy(url, opts)?;
    let headers = RefCell::new(ResponseHeaders::default());
    let failure: RefCell<Option<BibdumpError>> = RefCell::new(None);

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                headers.borrow_mut().push_raw(data);
                true
            })
            .map_err(|e| transport(url, e))?;
        transfer
            .write_function(|data| {
                let headers = headers.borrow();
                if let Some(status) = headers.status().filter(|s| !is_success(*s)) {
                    *failure.borrow_mut() = Some(BibdumpError::HttpStatus {
                        url: url.to_string(),
                        status,
                    });
                    return Ok(0); // abort transfer
                }
                match on_chunk(&headers, data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        *failure.borrow_mut() = Some(e);
                        Ok(0) // abort transfer
                    }
                }
            })
            .map_err(|e| transport(url, e))?;
        transfer.perform()
    };

    if let Some(err) = failure.into_inner() {
        return Err(err);
    }
    performed.map_err(|e| transport(url, e))?;

    let code = easy.response_code().map_err(|e| transport(url, e))?;
    if !is_success(code) {
        return Err(BibdumpError::HttpStatus {
            url: url.to_string(),
            status: code,
        });
    }

    Ok(headers.into_inner())
}

/// GET `url` and return the whole body. Meant for small documents such as the dump index.
pub fn get_bytes(url: &str, opts: &HttpOptions) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    get_streaming(url, opts, |_, chunk| {
        body.extend_from_slice(chunk);
        Ok(())
    })?;
    Ok(body)
}
