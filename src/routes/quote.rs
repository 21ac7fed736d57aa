use std::collections::HashMap;
use std::sync::Mutex;

use actix_web::{web, HttpResponse, Responder};
use bson::oid::ObjectId;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::interface::OfferStore;
use crate::db::mongo_store::MongoOfferStore;
use crate::models::quote::QuoteDraft;
use crate::services::email;
use crate::services::email::EmailService;
use crate::services::pricing::PricingService;
use crate::services::wizard::{QuoteWizard, WizardError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// In-process draft sessions. One draft per wizard session; there is no
/// cross-session coordination, matching the single-user model.
pub struct DraftSessions {
    drafts: Mutex<HashMap<Uuid, QuoteDraft>>,
}

impl DraftSessions {
    pub fn new() -> Self {
        DraftSessions {
            drafts: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<QuoteDraft> {
        self.drafts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    pub fn put(&self, id: Uuid, draft: QuoteDraft) {
        self.drafts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, draft);
    }

    /// Drops a finished session so the map stays bounded.
    pub fn remove(&self, id: &Uuid) -> Option<QuoteDraft> {
        self.drafts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(id)
    }
}

impl Default for DraftSessions {
    fn default() -> Self {
        DraftSessions::new()
    }
}

fn parse_session_id(raw: &str) -> Result<Uuid, HttpResponse> {
    Uuid::parse_str(raw).map_err(|_| HttpResponse::BadRequest().body("Invalid draft ID"))
}

fn wizard_error_response(err: WizardError) -> HttpResponse {
    match err {
        WizardError::Validation(validation) => {
            HttpResponse::UnprocessableEntity().json(validation)
        }
        WizardError::IncompleteDraft(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "incomplete_draft".to_string(),
            message,
        }),
        WizardError::Store(err) => {
            eprintln!("Store operation failed: {:?}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "store_error".to_string(),
                message: "Failed to save the quote".to_string(),
            })
        }
    }
}

/*
    POST /api/quotes/drafts
*/
pub async fn create_draft(sessions: web::Data<DraftSessions>) -> impl Responder {
    let id = Uuid::new_v4();
    let draft = QuoteDraft::new();
    sessions.put(id, draft.clone());
    HttpResponse::Created().json(json!({ "id": id, "draft": draft }))
}

/*
    GET /api/quotes/drafts/{id}
*/
pub async fn get_draft(
    sessions: web::Data<DraftSessions>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match sessions.get(&id) {
        Some(draft) => HttpResponse::Ok().json(draft),
        None => HttpResponse::NotFound().body("Draft not found"),
    }
}

/*
    PUT /api/quotes/drafts/{id}

    Step components replace the whole draft state. The persisted offer id
    is assigned server-side exactly once, so an incoming body without one
    keeps the id already on file.
*/
pub async fn update_draft(
    sessions: web::Data<DraftSessions>,
    path: web::Path<String>,
    input: web::Json<QuoteDraft>,
) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let existing = match sessions.get(&id) {
        Some(draft) => draft,
        None => return HttpResponse::NotFound().body("Draft not found"),
    };

    let mut draft = input.into_inner();
    if draft.offer_id.is_none() {
        draft.offer_id = existing.offer_id;
    }
    draft.created_at = existing.created_at;
    draft.updated_at = Some(mongodb::bson::DateTime::now());

    sessions.put(id, draft.clone());
    HttpResponse::Ok().json(draft)
}

/*
    POST /api/quotes/drafts/{id}/next
*/
pub async fn next_step(
    sessions: web::Data<DraftSessions>,
    store: web::Data<MongoOfferStore>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut draft = match sessions.get(&id) {
        Some(draft) => draft,
        None => return HttpResponse::NotFound().body("Draft not found"),
    };

    match QuoteWizard::advance(store.get_ref(), &mut draft).await {
        Ok(step) => {
            sessions.put(id, draft.clone());
            HttpResponse::Ok().json(json!({ "step": step, "draft": draft }))
        }
        Err(err) => wizard_error_response(err),
    }
}

/*
    POST /api/quotes/drafts/{id}/previous
*/
pub async fn previous_step(
    sessions: web::Data<DraftSessions>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut draft = match sessions.get(&id) {
        Some(draft) => draft,
        None => return HttpResponse::NotFound().body("Draft not found"),
    };

    let step = QuoteWizard::go_back(&mut draft);
    sessions.put(id, draft.clone());
    HttpResponse::Ok().json(json!({ "step": step, "draft": draft }))
}

/*
    POST /api/quotes/drafts/{id}/goto/{step}
*/
pub async fn goto_step(
    sessions: web::Data<DraftSessions>,
    path: web::Path<(String, usize)>,
) -> impl Responder {
    let (raw_id, index) = path.into_inner();
    let id = match parse_session_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut draft = match sessions.get(&id) {
        Some(draft) => draft,
        None => return HttpResponse::NotFound().body("Draft not found"),
    };

    match QuoteWizard::jump_to(&mut draft, index) {
        Some(step) => {
            sessions.put(id, draft.clone());
            HttpResponse::Ok().json(json!({ "step": step, "draft": draft }))
        }
        None => HttpResponse::BadRequest().body("Invalid step index"),
    }
}

/*
    GET /api/quotes/drafts/{id}/totals
*/
pub async fn get_totals(
    sessions: web::Data<DraftSessions>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match sessions.get(&id) {
        Some(draft) => HttpResponse::Ok().json(PricingService::totals(&draft)),
        None => HttpResponse::NotFound().body("Draft not found"),
    }
}

/*
    POST /api/quotes/drafts/{id}/submit

    Replace-all persistence of every category's line items, then the
    quote-ready email when the draft carries a client address. A failed
    send is reported but does not undo the persisted quote.
*/
pub async fn submit_draft(
    sessions: web::Data<DraftSessions>,
    store: web::Data<MongoOfferStore>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut draft = match sessions.get(&id) {
        Some(draft) => draft,
        None => return HttpResponse::NotFound().body("Draft not found"),
    };

    let totals = match QuoteWizard::submit(store.get_ref(), &mut draft).await {
        Ok(totals) => totals,
        Err(err) => return wizard_error_response(err),
    };
    // The wizard is done with this draft; editing starts a fresh
    // session via from-offer hydration.
    sessions.remove(&id);

    let offer_id = match draft.offer_id {
        Some(offer_id) => offer_id,
        None => {
            // submit() guarantees the id; defend anyway.
            return HttpResponse::InternalServerError().body("Missing offer ID after submit");
        }
    };

    let email_sent = match &draft.client_email {
        Some(to_email) => send_quote_ready_email(store.get_ref(), offer_id, to_email, &draft).await,
        None => false,
    };

    HttpResponse::Ok().json(json!({
        "offer_id": offer_id.to_hex(),
        "totals": totals,
        "email_sent": email_sent,
    }))
}

async fn send_quote_ready_email(
    store: &MongoOfferStore,
    offer_id: ObjectId,
    to_email: &str,
    draft: &QuoteDraft,
) -> bool {
    let offer = match store.find_offer(offer_id).await {
        Ok(Some(offer)) => offer,
        Ok(None) => {
            eprintln!("Offer {} vanished before the quote email", offer_id);
            return false;
        }
        Err(err) => {
            eprintln!("Failed to load offer for the quote email: {:?}", err);
            return false;
        }
    };

    let email_service = match EmailService::new() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("Failed to initialize email service: {:?}", err);
            return false;
        }
    };

    let message = email::quote_generated(
        &draft.client_name,
        &offer.code,
        &offer.name,
        offer.total,
        &draft.currency.to_string(),
    );

    match email_service.send(to_email, &message, None).await {
        Ok(()) => true,
        Err(err) => {
            eprintln!("Failed to send quote email: {:?}", err);
            false
        }
    }
}

/*
    POST /api/quotes/drafts/from-offer/{offer_id}

    Hydrates a new editable draft session from a persisted offer.
*/
pub async fn draft_from_offer(
    sessions: web::Data<DraftSessions>,
    store: web::Data<MongoOfferStore>,
    path: web::Path<String>,
) -> impl Responder {
    let offer_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid offer ID"),
    };

    match QuoteWizard::hydrate_from_offer(store.get_ref(), offer_id).await {
        Ok(draft) => {
            let id = Uuid::new_v4();
            sessions.put(id, draft.clone());
            HttpResponse::Created().json(json!({ "id": id, "draft": draft }))
        }
        Err(WizardError::Store(crate::db::interface::StoreError::NotFound)) => {
            HttpResponse::NotFound().body("Offer not found")
        }
        Err(err) => wizard_error_response(err),
    }
}
