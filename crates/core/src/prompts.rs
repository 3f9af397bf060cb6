// Prompt templates for the text-driven dashboard tabs.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    PatientChat,
    DiseasePrediction,
    TreatmentPlan,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("{}", .0.blank_warning())]
    Blank(Task),
}

impl Task {
    pub const ALL: [Task; 3] = [Task::PatientChat, Task::DiseasePrediction, Task::TreatmentPlan];

    pub fn title(self) -> &'static str {
        match self {
            Task::PatientChat => "Patient Chat",
            Task::DiseasePrediction => "Disease Prediction",
            Task::TreatmentPlan => "Treatment Plan",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Task::PatientChat => "Ask a health-related question",
            Task::DiseasePrediction => "Predict Disease Based on Symptoms",
            Task::TreatmentPlan => "Get a Treatment Plan for a Condition",
        }
    }

    pub fn field_label(self) -> &'static str {
        match self {
            Task::PatientChat => "Your Question",
            Task::DiseasePrediction => "Enter Symptoms",
            Task::TreatmentPlan => "Condition",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Task::PatientChat => "e.g., What should I do if I have chest pain?",
            Task::DiseasePrediction => "e.g., fever, headache, nausea",
            Task::TreatmentPlan => "e.g., Diabetes",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Task::PatientChat => "Get Answer",
            Task::DiseasePrediction => "Predict Disease",
            Task::TreatmentPlan => "Generate Treatment Plan",
        }
    }

    pub fn blank_warning(self) -> &'static str {
        match self {
            Task::PatientChat => "Please enter a valid question.",
            Task::DiseasePrediction => "Please enter valid symptoms.",
            Task::TreatmentPlan => "Please enter a valid condition.",
        }
    }

    /// Validates `input` and wraps it in the task's template. The input is
    /// substituted as typed; only the blank check looks at trimmed text.
    pub fn build_prompt(self, input: &str) -> Result<String, PromptError> {
        if input.trim().is_empty() {
            return Err(PromptError::Blank(self));
        }
        Ok(match self {
            Task::PatientChat => format!(
                "A patient asked: '{}'. Provide a medically accurate, clear, and empathetic answer.",
                input
            ),
            Task::DiseasePrediction => format!(
                "Symptoms reported: {}. Predict possible diseases or conditions with confidence levels.",
                input
            ),
            Task::TreatmentPlan => format!(
                "Condition: {}. Suggest a detailed treatment plan including medications, lifestyle modifications, and follow-up actions.",
                input
            ),
        })
    }
}
