//! Step-by-step concept illustration flow.

use chalkboard_core::{Output, encode_data_uri};
use chalkboard_error::{ChalkboardErrorKind, ChalkboardResult, GeminiErrorKind, SchemaError, SchemaErrorKind};
use chalkboard_interface::ImageGeneration;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// How many illustration steps a concept is broken into.
const STEP_COUNT: usize = 3;

/// Caller input for concept illustration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptImageRequest {
    /// The description of the concept to be explained
    pub concept_description: String,
}

impl ConceptImageRequest {
    /// Validate the request against its declared schema.
    pub fn validate(&self) -> ChalkboardResult<()> {
        if self.concept_description.trim().is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::TooShort {
                field: "concept_description",
                min: 1,
            })
            .into());
        }
        Ok(())
    }
}

/// One illustrated step of a concept breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptStep {
    /// The description of the step
    pub step_description: String,
    /// The generated illustration as a `data:image/...;base64,` URI
    pub image_url: String,
}

/// The illustrated concept breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptImages {
    /// The steps, in order
    pub steps: Vec<ConceptStep>,
}

/// Break a concept into steps and generate one illustration per step.
///
/// Steps are generated sequentially. A step whose image the model declines
/// to produce is skipped with a warning; transport and quota failures are
/// terminal.
#[instrument(skip(driver, request))]
pub async fn generate_concept_images<D>(
    driver: &D,
    request: &ConceptImageRequest,
) -> ChalkboardResult<ConceptImages>
where
    D: ImageGeneration + ?Sized,
{
    request.validate()?;

    let mut steps = Vec::with_capacity(STEP_COUNT);

    for i in 1..=STEP_COUNT {
        let step_description = format!("Step {}: Briefly explain this part of the concept.", i);
        let image_prompt = format!(
            "Generate an image that illustrates {} for the concept: {}.",
            step_description, request.concept_description,
        );

        match driver.generate_image(&image_prompt).await {
            Ok(Output::Image { mime, data }) => {
                let mime = mime.unwrap_or_else(|| "image/png".to_string());
                steps.push(ConceptStep {
                    step_description,
                    image_url: encode_data_uri(&mime, &data),
                });
            }
            Ok(_) => {
                warn!(step = i, "Image model returned a non-image output, skipping step");
            }
            Err(e) => {
                // A model that answers without an image skips the step; any
                // other failure aborts the flow.
                if is_missing_output(&e) {
                    warn!(step = i, error = %e, "No image produced for step, skipping");
                } else {
                    return Err(e);
                }
            }
        }
    }

    Ok(ConceptImages { steps })
}

fn is_missing_output(error: &chalkboard_error::ChalkboardError) -> bool {
    matches!(
        error.kind(),
        ChalkboardErrorKind::Gemini(g) if matches!(g.kind, GeminiErrorKind::MissingOutput(_))
    )
}
