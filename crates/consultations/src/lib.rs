//! Client consultations: scheduling, lifecycle actions and notes.

pub mod consultation;
pub mod note;

pub use consultation::{
    CancelRequest, CompleteRequest, Consultation, ConsultationMode, ConsultationPayload,
    ConsultationPriority, ConsultationStatus, ConsultationType, RescheduleRequest, StatusRequest,
};
pub use note::{ConsultationNote, NotePayload};
