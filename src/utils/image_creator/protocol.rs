//! The submit → poll → extract → save protocol, written once and run on any
//! [`Driver`].

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use super::driver::{Driver, Request, Response};
use super::error::{ImageCreatorError, ImageCreatorResult, snippet};
use super::extract::extract_image_urls;
use super::persist::{FileSequence, SavedFile};
use super::session::SessionConfig;

/// The service never produces more than this many images per prompt.
pub const MAX_IMAGES: usize = 4;

/// Primary creation endpoint variant, posted with a form body.
const PRIMARY_VARIANT: u8 = 4;
/// Fallback creation endpoint variant, query string only.
const FALLBACK_VARIANT: u8 = 3;

const UNDER_REVIEW_MARKER: &str = "prompt is being reviewed";
const BLOCKED_MARKER: &str = "prompt has been blocked";
const UNSUPPORTED_LANGUAGE_MARKER: &str = "offer image creator in more languages";

/// Marker present in poll responses while the job is still running.
const IN_PROGRESS_MARKER: &str = "errorMessage";

/// A submitted prompt waiting for its results.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub prompt: String,
    pub id: String,
    pub poll_url: String,
    pub submitted_at: DateTime<Utc>,
}

/// Image creator protocol bound to one session.
pub struct ImageGen<D> {
    driver: D,
    config: Arc<SessionConfig>,
}

impl<D: Driver> ImageGen<D> {
    pub fn with_driver(driver: D, config: SessionConfig) -> Self {
        Self {
            driver,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn create_url(&self, encoded_prompt: &str, variant: u8) -> String {
        format!(
            "{}/images/create?q={}&rt={}&FORM=GENCRE",
            self.config.base_url, encoded_prompt, variant
        )
    }

    fn absolute_url(&self, location: &str) -> String {
        if Url::parse(location).is_ok() {
            location.to_string()
        } else {
            format!("{}{}", self.config.base_url, location)
        }
    }

    /// Submits a prompt and returns the job to poll.
    ///
    /// Tries the primary endpoint first and falls back once to the query-only
    /// variant if the service does not answer with a redirect.
    pub async fn submit(&self, prompt: &str) -> ImageCreatorResult<GenerationJob> {
        if prompt.trim().is_empty() {
            return Err(ImageCreatorError::EmptyPrompt);
        }

        let encoded = encode_prompt(prompt);
        debug!("Submitting prompt ({} chars)", prompt.len());

        let primary = self
            .driver
            .send(Request::post(
                self.create_url(&encoded, PRIMARY_VARIANT),
                Some(format!("q={encoded}&qs=ds")),
            ))
            .await?;
        check_moderation(&primary)?;

        let redirect = if primary.status == StatusCode::FOUND {
            primary
        } else {
            warn!(
                "Primary create endpoint answered {}, trying rt={}",
                primary.status, FALLBACK_VARIANT
            );
            let fallback = self
                .driver
                .send(Request::post(
                    self.create_url(&encoded, FALLBACK_VARIANT),
                    None,
                ))
                .await?;
            check_moderation(&fallback)?;

            if fallback.status != StatusCode::FOUND {
                return Err(ImageCreatorError::RedirectFailed {
                    status: fallback.status,
                    body: snippet(&fallback.text()),
                });
            }
            fallback
        };

        let location = redirect
            .location
            .as_deref()
            .map(|location| location.replace("&nfy=1", ""))
            .ok_or_else(|| ImageCreatorError::RedirectFailed {
                status: redirect.status,
                body: "redirect without a Location header".to_string(),
            })?;
        let id = parse_job_id(&location).ok_or_else(|| ImageCreatorError::RedirectFailed {
            status: redirect.status,
            body: format!("no job id in redirect target {location}"),
        })?;

        // Primes server-side state for the job; the answer itself is unused.
        let primer = self
            .driver
            .send(Request::get(self.absolute_url(&location)))
            .await?;
        debug!("Job {} accepted, redirect target answered {}", id, primer.status);

        Ok(GenerationJob {
            prompt: prompt.to_string(),
            poll_url: format!(
                "{}/images/create/async/results/{}?q={}",
                self.config.base_url, id, encoded
            ),
            id,
            submitted_at: Utc::now(),
        })
    }

    /// Polls until the job's results page is complete or the budget runs out.
    pub async fn poll(&self, job: &GenerationJob) -> ImageCreatorResult<String> {
        let budget = self.config.poll_budget;
        let start = Instant::now();
        debug!("Polling job {} (budget {:?})", job.id, budget);

        loop {
            let elapsed = start.elapsed();
            if elapsed >= budget {
                return Err(ImageCreatorError::Timeout {
                    job_id: job.id.clone(),
                    elapsed,
                });
            }

            let response = self.driver.send(Request::get(job.poll_url.as_str())).await?;
            if response.status != StatusCode::OK {
                return Err(ImageCreatorError::PollFailed {
                    job_id: job.id.clone(),
                    status: response.status,
                });
            }

            let body = response.text();
            if !body.is_empty() && !body.contains(IN_PROGRESS_MARKER) {
                debug!("Job {} completed after {:?}", job.id, start.elapsed());
                return Ok(body);
            }

            let remaining = budget.saturating_sub(start.elapsed());
            self.driver
                .sleep(self.config.poll_interval.min(remaining))
                .await;
        }
    }

    /// Submits, waits for and extracts the image links for a prompt.
    pub async fn get_images(&self, prompt: &str) -> ImageCreatorResult<Vec<String>> {
        let job = self.submit(prompt).await?;
        let html = self.poll(&job).await?;
        let urls = extract_image_urls(&html)?;
        debug!("Job {} produced {} image links", job.id, urls.len());
        Ok(urls)
    }

    /// Downloads up to `count` of `urls` into `out_dir`.
    ///
    /// Files are named `{prefix_}{n}.jpeg` without overwriting anything
    /// already there. A failed download aborts the batch; files saved before
    /// it are kept.
    pub async fn save_images(
        &self,
        urls: &[String],
        out_dir: &Path,
        count: Option<usize>,
        file_prefix: Option<&str>,
    ) -> ImageCreatorResult<Vec<SavedFile>> {
        let entries = self.driver.scan_dir(out_dir).await?;
        let mut sequence = FileSequence::new(out_dir, file_prefix, entries)?;
        let count = count.unwrap_or(urls.len());
        let mut saved = Vec::with_capacity(count.min(urls.len()));

        for url in urls.iter().take(count) {
            if Url::parse(url).is_err() {
                return Err(ImageCreatorError::InappropriateContent { url: url.clone() });
            }

            let (index, path) = sequence.peek_free();
            let response = self.driver.send(Request::get(url.as_str())).await?;
            if response.status != StatusCode::OK {
                return Err(ImageCreatorError::DownloadFailed {
                    url: url.clone(),
                    status: response.status,
                });
            }

            self.driver.write_file(&path, &response.body).await?;
            debug!("Saved {} to {}", url, path.display());
            saved.push(SavedFile { path, index });
            sequence.advance();
        }

        Ok(saved)
    }

    /// Runs the whole flow for one prompt and returns the saved files.
    ///
    /// # Errors
    ///
    /// Fails with [`ImageCreatorError::TooManyImagesRequested`] before any
    /// request is made if `max_images` exceeds [`MAX_IMAGES`].
    pub async fn generate(
        &self,
        prompt: &str,
        out_dir: &Path,
        max_images: usize,
    ) -> ImageCreatorResult<Vec<SavedFile>> {
        check_image_count(max_images)?;
        let urls = self.get_images(prompt).await?;
        self.save_images(&urls, out_dir, Some(max_images), None).await
    }
}

pub(crate) fn check_image_count(requested: usize) -> ImageCreatorResult<()> {
    if requested > MAX_IMAGES {
        return Err(ImageCreatorError::TooManyImagesRequested {
            requested,
            max: MAX_IMAGES,
        });
    }
    Ok(())
}

/// Percent-encodes a prompt for the query string and form body, leaving `/`
/// as is the way the web client does.
fn encode_prompt(prompt: &str) -> String {
    urlencoding::encode(prompt).replace("%2F", "/")
}

fn check_moderation(response: &Response) -> ImageCreatorResult<()> {
    let body = response.text().to_lowercase();
    if body.contains(UNDER_REVIEW_MARKER) {
        Err(ImageCreatorError::UnderReview)
    } else if body.contains(BLOCKED_MARKER) {
        Err(ImageCreatorError::Blocked)
    } else if body.contains(UNSUPPORTED_LANGUAGE_MARKER) {
        Err(ImageCreatorError::UnsupportedLanguage)
    } else {
        Ok(())
    }
}

/// Job id is whatever follows the last `id=` of the redirect target.
fn parse_job_id(location: &str) -> Option<String> {
    location
        .rsplit_once("id=")
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
