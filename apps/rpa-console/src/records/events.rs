//! Scheduled events.

use rpa_storage::{
    fetch_record, insert_record, query_records, to_fields, Collection, Direction, DocumentId,
    DocumentStore, Event, Query, Stored, EVENT_DATE_TIME_FIELD,
};
use tracing::info;

use super::RecordContext;
use crate::error::RecordError;
use crate::validation::{parse_date_time, required, FieldErrors};

/// The event form. Add and update both submit every field.
#[derive(Clone, Debug, Default)]
pub struct EventInput {
    pub title: String,
    pub summary: String,
    pub place: String,
    /// `YYYY-MM-DDTHH:MM`, local wall-clock time
    pub date_time: String,
}

impl EventInput {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("title", required(&self.title, "Title is required"));
        errors.check("summary", required(&self.summary, "Summary is required"));
        errors.check("place", required(&self.place, "Place is required"));
        errors.check(
            "dateTime",
            required(&self.date_time, "Date and time is required").or_else(|| {
                parse_date_time(&self.date_time)
                    .is_none()
                    .then(|| "Please enter a valid date and time".to_string())
            }),
        );
        errors
    }

    fn into_event(self) -> Result<Event, FieldErrors> {
        let errors = self.validate();
        match parse_date_time(&self.date_time) {
            Some(date_time) if errors.is_empty() => Ok(Event {
                title: self.title,
                summary: self.summary,
                place: self.place,
                date_time,
            }),
            _ => Err(errors),
        }
    }
}

pub struct EventService {
    ctx: RecordContext,
}

impl EventService {
    pub fn new(ctx: RecordContext) -> Self {
        Self { ctx }
    }

    pub async fn add(&self, input: EventInput) -> Result<DocumentId, RecordError> {
        let event = match input.into_event() {
            Ok(event) => event,
            Err(errors) => return self.ctx.reject(errors),
        };
        let result = insert_record(self.ctx.documents.as_ref(), &event).await;
        if let Ok(id) = &result {
            info!(id = %id, when = %event.date_time, "Event added");
        }
        self.ctx
            .report(result, "Event added successfully", "Failed to add event")
    }

    /// Events, soonest first.
    pub async fn list(&self) -> Result<Vec<Stored<Event>>, RecordError> {
        let query = Query::new().order_by(EVENT_DATE_TIME_FIELD, Direction::Ascending);
        let result = query_records(self.ctx.documents.as_ref(), &query).await;
        self.ctx.report_fetch(result, "Failed to fetch events")
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Stored<Event>, RecordError> {
        Ok(fetch_record(self.ctx.documents.as_ref(), id).await?)
    }

    pub async fn update(&self, id: &DocumentId, input: EventInput) -> Result<(), RecordError> {
        let event = match input.into_event() {
            Ok(event) => event,
            Err(errors) => return self.ctx.reject(errors),
        };
        let result = match to_fields(&event) {
            Ok(fields) => self.ctx.documents.update(Collection::Events, id, fields).await,
            Err(e) => Err(e),
        };
        self.ctx.report(
            result,
            "Event updated successfully",
            "Failed to update event",
        )
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<(), RecordError> {
        let result = self.ctx.documents.delete(Collection::Events, id).await;
        self.ctx.report(
            result,
            "Event deleted successfully",
            "Failed to delete event",
        )
    }
}
