use super::bundle::AssessmentBundle;
use crate::error::ConversionError;

/// A trait for custom export formats that can be converted into an `AssessmentBundle`.
///
/// Admin tools and storage layers rarely hand out the flat question/answer lists the
/// engine runs on. Implementing this trait on your own structs provides the translation
/// layer, so the engine never needs to know about your storage format.
///
/// # Example
///
/// ```rust,no_run
/// use shindan::prelude::*;
///
/// struct MyQuiz {
///     slug: String,
///     prompts: Vec<(String, Vec<String>)>,
/// }
///
/// impl IntoAssessment for MyQuiz {
///     fn into_assessment(self) -> std::result::Result<AssessmentBundle, ConversionError> {
///         let mut questions = Vec::new();
///         let mut answers = Vec::new();
///         for (q_index, (text, options)) in self.prompts.into_iter().enumerate() {
///             let question_id = format!("q{}", q_index + 1);
///             for (a_index, option) in options.into_iter().enumerate() {
///                 answers.push(Answer {
///                     id: format!("{}-a{}", question_id, a_index + 1),
///                     question_id: question_id.clone(),
///                     order: a_index as i32,
///                     answer_text: option,
///                     answer_value: EncodedPayload::default(),
///                 });
///             }
///             questions.push(Question {
///                 id: question_id,
///                 order: q_index as i32,
///                 question_text: text,
///                 description: None,
///                 conditional_logic: None,
///             });
///         }
///
///         Ok(AssessmentBundle {
///             config: AssessmentConfig {
///                 id: self.slug.clone(),
///                 slug: self.slug,
///                 title: String::new(),
///                 description: None,
///                 entry_question_id: None,
///                 scoring_method: ScoringMethod::DecisionTree,
///                 gate_behavior: GateBehavior::Ungated,
///                 published: true,
///             },
///             questions,
///             answers,
///             buckets: vec![],
///         })
///     }
/// }
/// ```
pub trait IntoAssessment {
    /// Consumes the object and converts it into a runnable assessment definition.
    fn into_assessment(self) -> Result<AssessmentBundle, ConversionError>;
}

impl IntoAssessment for AssessmentBundle {
    fn into_assessment(self) -> Result<AssessmentBundle, ConversionError> {
        Ok(self)
    }
}
