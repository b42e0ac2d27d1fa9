//! Error taxonomy for the image creator.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Longest response excerpt carried inside an error.
const SNIPPET_LIMIT: usize = 512;

pub type ImageCreatorResult<T> = Result<T, ImageCreatorError>;

/// Errors that can occur while generating, polling for or saving images.
///
/// Every variant is terminal: nothing in the image creator retries on its own.
#[derive(Error, Debug)]
pub enum ImageCreatorError {
    /// The service is holding the prompt for manual review.
    #[error("Your prompt is being reviewed by Bing. Try to change any sensitive words and try again.")]
    UnderReview,

    /// The service refused the prompt outright.
    #[error("Your prompt has been blocked by Bing. Try to change any bad words and try again.")]
    Blocked,

    /// The prompt language is not supported by the service.
    #[error("This language is currently not supported by Bing")]
    UnsupportedLanguage,

    /// Neither creation endpoint answered with a usable redirect.
    #[error("Redirect failed ({status}): {body}")]
    RedirectFailed { status: StatusCode, body: String },

    /// The polling endpoint answered with something other than 200.
    #[error("Could not get results for job {job_id} ({status})")]
    PollFailed { job_id: String, status: StatusCode },

    /// The job did not complete within the poll budget.
    #[error("Your request has timed out after {elapsed:?} (job {job_id})")]
    Timeout { job_id: String, elapsed: Duration },

    /// The results contained a moderation placeholder image.
    #[error("Unsafe image content detected: {url}")]
    UnsafeContent { url: String },

    /// The completed results held no image links.
    #[error("No images")]
    NoImages,

    /// An image could not be downloaded.
    #[error("Could not download image {url} ({status})")]
    DownloadFailed { url: String, status: StatusCode },

    /// A result link was not a usable URL.
    #[error(
        "Inappropriate contents found in the generated images. Please try again or try another prompt. ({url})"
    )]
    InappropriateContent { url: String },

    /// A required cookie was absent or empty.
    #[error("Missing auth cookie `{name}`")]
    MissingCredentials { name: &'static str },

    /// More images were requested than the service generates.
    #[error("The number of images must be {max} or less (requested {requested})")]
    TooManyImagesRequested { requested: usize, max: usize },

    /// The prompt is empty or only whitespace.
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    /// Error during HTTP request communication.
    #[error("HTTP communication failure: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The configured service base URL does not parse.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// A configured value cannot be sent as a header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Cuts a response body down to something that fits in an error message.
pub(crate) fn snippet(body: &str) -> String {
    if body.len() <= SNIPPET_LIMIT {
        return body.to_string();
    }

    let mut end = SNIPPET_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
