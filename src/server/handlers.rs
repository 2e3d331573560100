//! MCP tool handlers for the contact book.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.
//! The server owns one [`Session`]; every tool reads it to build the
//! [`AccessContext`] it passes to the services.

use crate::auth::{AccessContext, Session};
use crate::domain::{ContactId, PhoneId};
use crate::error::{AuthError, ServiceError};
use crate::metrics::Metrics;
use crate::models::{Contact, ContactChanges, ContactParams, Credentials, NewUser, PhoneDraft};
use crate::services::{ContactService, SessionService};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The MCP server that exposes the contact book as tools.
#[derive(Clone)]
pub struct ContactBookServer {
    contact_service: Arc<dyn ContactService>,
    session_service: Arc<dyn SessionService>,
    session: Arc<RwLock<Session>>,
    metrics: Metrics,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for ContactBookServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "contact-book".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Address book of contacts with three phone numbers each. Call login first; contact tools are refused for anonymous sessions.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
struct LoginParams {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListContactsParams {
    /// Case-sensitive prefix of the last name, usually one letter
    #[serde(default)]
    letter: Option<String>,
    /// Also list hidden contacts (default: false)
    #[serde(default)]
    include_hidden: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ContactIdParams {
    contact_id: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PhoneInput {
    /// Id of an existing phone of this contact, when updating it in place
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    phone_type: String,
    #[serde(default)]
    phone: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateContactParams {
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phones: Vec<PhoneInput>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateContactParams {
    contact_id: u64,
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
    #[serde(default)]
    email: Option<String>,
    /// Replaces the whole phone list when present
    #[serde(default)]
    phones: Option<Vec<PhoneInput>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RegisterUserParams {
    username: String,
    password: String,
}

fn contact_id(raw: u64) -> Result<ContactId, McpError> {
    ContactId::new(raw).map_err(|e| McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(e.to_string()),
        data: None,
    })
}

fn phone_drafts(inputs: Vec<PhoneInput>) -> Result<Vec<PhoneDraft>, McpError> {
    inputs
        .into_iter()
        .map(|input| {
            let id = input
                .id
                .map(PhoneId::new)
                .transpose()
                .map_err(|e| McpError {
                    code: ErrorCode::INVALID_PARAMS,
                    message: Cow::from(e.to_string()),
                    data: None,
                })?;
            Ok(PhoneDraft {
                id,
                phone_type: input.phone_type,
                phone: input.phone,
            })
        })
        .collect()
}

/// Map a service error onto an MCP error code. Field errors travel in `data`.
pub fn to_mcp_error(e: ServiceError) -> McpError {
    let code = match &e {
        ServiceError::Validation { .. } => ErrorCode::INVALID_PARAMS,
        ServiceError::Unauthorized { .. } => ErrorCode::INVALID_REQUEST,
        ServiceError::NotFound { .. } => ErrorCode::RESOURCE_NOT_FOUND,
        ServiceError::Storage(_) => ErrorCode::INTERNAL_ERROR,
    };
    let data = match &e {
        ServiceError::Validation { errors, original } => Some(serde_json::json!({
            "errors": errors,
            "original": original,
        })),
        _ => None,
    };
    McpError {
        code,
        message: Cow::from(e.to_string()),
        data,
    }
}

fn auth_to_mcp_error(e: AuthError) -> McpError {
    let code = match &e {
        AuthError::InvalidCredentials => ErrorCode::INVALID_REQUEST,
        AuthError::Repository(_) => ErrorCode::INTERNAL_ERROR,
    };
    McpError {
        code,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn to_internal_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

/// Drop hidden contacts unless asked for them.
fn visible(contacts: Vec<Contact>, include_hidden: bool) -> Vec<Contact> {
    if include_hidden {
        contacts
    } else {
        contacts.into_iter().filter(|c| !c.hidden).collect()
    }
}

fn json_result(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(to_internal_error)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// Tool router implementation
#[tool_router]
impl ContactBookServer {
    /// Create a new server with an anonymous session.
    pub fn new(
        contact_service: Arc<dyn ContactService>,
        session_service: Arc<dyn SessionService>,
        metrics: Metrics,
    ) -> Self {
        Self {
            contact_service,
            session_service,
            session: Arc::new(RwLock::new(Session::default())),
            metrics,
            tool_router: Self::tool_router(),
        }
    }

    async fn context(&self) -> AccessContext {
        self.session.read().await.context()
    }

    /// Sign in for the rest of this session.
    #[tool(description = "Sign in with a username and password. Contact tools require a signed-in session.")]
    async fn login(&self, params: Parameters<LoginParams>) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let credentials = Credentials::new(params.username, params.password);

        let mut session = self.session.write().await;
        let user_id = self
            .session_service
            .login(&mut *session, &credentials)
            .await
            .map_err(auth_to_mcp_error)?;

        json_result(&serde_json::json!({ "logged_in": true, "user_id": user_id }))
    }

    /// End the session.
    #[tool(description = "Sign out. Later contact tools are refused until the next login.")]
    async fn logout(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.write().await;
        self.session_service.logout(&mut *session);
        json_result(&serde_json::json!({ "logged_in": false }))
    }

    /// List contacts, optionally by last-name initial.
    #[tool(
        description = "List contacts. With a letter, only contacts whose last name starts with it (case-sensitive), ordered by last name; otherwise all contacts in creation order. Hidden contacts are left out unless include_hidden is true."
    )]
    async fn list_contacts(
        &self,
        params: Parameters<ListContactsParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let ctx = self.context().await;
        let letter = params.letter.as_deref().filter(|l| !l.is_empty());

        let contacts = self
            .contact_service
            .list(&ctx, letter)
            .await
            .map_err(to_mcp_error)?;
        let contacts = visible(contacts, params.include_hidden);

        json_result(&serde_json::json!({
            "count": contacts.len(),
            "contacts": contacts.iter().map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "name": c.name(),
                    "email": c.email,
                    "hidden": c.hidden,
                })
            }).collect::<Vec<_>>(),
        }))
    }

    /// Retrieve one contact with its phones.
    #[tool(description = "Retrieve a contact and its three phones by id")]
    async fn get_contact(
        &self,
        params: Parameters<ContactIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = contact_id(params.0.contact_id)?;
        let ctx = self.context().await;

        let contact = self
            .contact_service
            .show(&ctx, id)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }

    /// Create a contact together with its phones.
    #[tool(
        description = "Create a contact. firstname, lastname and a unique email are required, plus exactly three phones with distinct numbers."
    )]
    async fn create_contact(
        &self,
        params: Parameters<CreateContactParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let ctx = self.context().await;

        let contact_params = ContactParams {
            firstname: params.firstname,
            lastname: params.lastname,
            email: params.email,
            phones: phone_drafts(params.phones)?,
        };

        let contact = self
            .contact_service
            .create(&ctx, contact_params)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }

    /// Change fields of an existing contact.
    #[tool(
        description = "Update a contact. Omitted fields are kept; a phones list replaces all phones. On failure the stored contact is unchanged."
    )]
    async fn update_contact(
        &self,
        params: Parameters<UpdateContactParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let id = contact_id(params.contact_id)?;
        let ctx = self.context().await;

        let changes = ContactChanges {
            firstname: params.firstname,
            lastname: params.lastname,
            email: params.email,
            phones: params.phones.map(phone_drafts).transpose()?,
        };

        let contact = self
            .contact_service
            .update(&ctx, id, changes)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }

    /// Hide a contact.
    #[tool(description = "Mark a contact hidden. Hiding an already hidden contact succeeds.")]
    async fn hide_contact(
        &self,
        params: Parameters<ContactIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = contact_id(params.0.contact_id)?;
        let ctx = self.context().await;

        let contact = self
            .contact_service
            .hide(&ctx, id)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }

    /// Delete a contact and its phones.
    #[tool(description = "Delete a contact and all of its phones")]
    async fn delete_contact(
        &self,
        params: Parameters<ContactIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = contact_id(params.0.contact_id)?;
        let ctx = self.context().await;

        self.contact_service
            .delete(&ctx, id)
            .await
            .map_err(to_mcp_error)?;

        json_result(&serde_json::json!({ "deleted": id }))
    }

    /// Export every contact as CSV.
    #[tool(description = "Export all contacts as CSV with a Name,Email header")]
    async fn export_contacts(&self) -> Result<CallToolResult, McpError> {
        let ctx = self.context().await;
        let csv = self
            .contact_service
            .export_csv(&ctx)
            .await
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(csv)]))
    }

    /// Create another login.
    #[tool(description = "Create another user account. Requires a signed-in session.")]
    async fn register_user(
        &self,
        params: Parameters<RegisterUserParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let ctx = self.context().await;

        let user = self
            .session_service
            .register(
                &ctx,
                NewUser {
                    username: params.username,
                    password: params.password,
                },
            )
            .await
            .map_err(to_mcp_error)?;

        json_result(&user)
    }

    /// Operation counters for this process.
    #[tool(description = "Counters of contact writes, validation failures and refused calls")]
    async fn get_metrics(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.metrics.summary())
    }
}
