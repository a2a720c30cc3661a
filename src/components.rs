//! UI Components
//!
//! TigerStyle: Declarative page descriptions for the FastUI client.
//!
//! Handlers never render anything themselves. They return a list of
//! [`Component`]s which the prebuilt FastUI React bundle turns into a page.
//! The serde layout here is the FastUI wire format:
//! - Components are tagged by `"type"` with their PascalCase name
//! - Fields are camelCase
//! - Unset optional fields are omitted, never sent as `null`

use serde::Serialize;
use serde_json::Value;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Heading level used for page titles
pub const PAGE_HEADING_LEVEL: u8 = 2;

// =============================================================================
// Events
// =============================================================================

/// Something the client does when a component is activated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    /// Navigate to a client-side route
    GoTo { url: String },
    /// Go back in browser history
    Back,
    /// Fire a named event inside the current page
    Page { name: String },
}

impl Event {
    /// Navigate to `url`
    pub fn go_to(url: impl Into<String>) -> Self {
        Self::GoTo { url: url.into() }
    }

    /// Fire the page event `name`
    pub fn page(name: impl Into<String>) -> Self {
        Self::Page { name: name.into() }
    }
}

// =============================================================================
// Display
// =============================================================================

/// How a value is displayed in tables and detail views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Date,
}

/// A column of a table, or a row of a detail view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLookup {
    /// Field of the row object to show
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<DisplayMode>,
    /// Fired when the cell is clicked; `{field}` placeholders in go-to
    /// urls are filled in by the client from the row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_click: Option<Event>,
}

impl DisplayLookup {
    pub fn new(field: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            title: Some(title.into()),
            mode: None,
            on_click: None,
        }
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_on_click(mut self, event: Event) -> Self {
        self.on_click = Some(event);
        self
    }
}

// =============================================================================
// Forms
// =============================================================================

/// HTML `type` of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputHtmlType {
    Text,
    Date,
    Hidden,
}

/// How a form is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormMethod {
    #[default]
    Post,
}

/// A single form input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum FormField {
    #[serde(rename = "FormFieldInput")]
    Input {
        name: String,
        title: String,
        required: bool,
        locked: bool,
        html_type: InputHtmlType,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial: Option<Value>,
    },
}

impl FormField {
    /// A required visible input
    pub fn input(name: impl Into<String>, title: impl Into<String>, html_type: InputHtmlType) -> Self {
        Self::Input {
            name: name.into(),
            title: title.into(),
            required: true,
            locked: false,
            html_type,
            initial: None,
        }
    }

    /// A hidden input carrying `initial`
    pub fn hidden(name: impl Into<String>, initial: impl Into<Value>) -> Self {
        Self::Input {
            name: name.into(),
            title: String::new(),
            required: true,
            locked: false,
            html_type: InputHtmlType::Hidden,
            initial: Some(initial.into()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Input { name, .. } => name,
        }
    }
}

// =============================================================================
// Components
// =============================================================================

/// A node of the UI tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Component {
    Page {
        components: Vec<Component>,
    },
    Heading {
        text: String,
        level: u8,
    },
    Text {
        text: String,
    },
    Link {
        components: Vec<Component>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_click: Option<Event>,
    },
    Button {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_click: Option<Event>,
    },
    Table {
        data: Vec<Value>,
        columns: Vec<DisplayLookup>,
    },
    Details {
        data: Value,
        fields: Vec<DisplayLookup>,
    },
    /// A form whose fields are listed explicitly
    Form {
        submit_url: String,
        form_fields: Vec<FormField>,
        method: FormMethod,
        #[serde(skip_serializing_if = "Option::is_none")]
        footer: Option<Vec<Component>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        submit_trigger: Option<Event>,
    },
    /// A form generated from a form model
    ModelForm {
        submit_url: String,
        form_fields: Vec<FormField>,
        method: FormMethod,
    },
    /// Fire an event as soon as the client receives this component
    FireEvent {
        event: Event,
    },
}

impl Component {
    pub fn page(components: Vec<Component>) -> Self {
        Self::Page { components }
    }

    /// A page title heading
    pub fn heading(text: impl Into<String>) -> Self {
        Self::Heading {
            text: text.into(),
            level: PAGE_HEADING_LEVEL,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// A text link that goes back in history
    pub fn back_link(label: impl Into<String>) -> Self {
        Self::Link {
            components: vec![Self::text(label)],
            on_click: Some(Event::Back),
        }
    }

    pub fn button(text: impl Into<String>, on_click: Event) -> Self {
        Self::Button {
            text: text.into(),
            on_click: Some(on_click),
        }
    }

    /// A table with one row per item
    pub fn table<T: Serialize>(
        rows: &[T],
        columns: Vec<DisplayLookup>,
    ) -> Result<Self, serde_json::Error> {
        let data = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Table { data, columns })
    }

    /// A read-only view of every listed field of `item`
    pub fn details<T: Serialize>(
        item: &T,
        fields: Vec<DisplayLookup>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::Details {
            data: serde_json::to_value(item)?,
            fields,
        })
    }

    pub fn model_form(submit_url: impl Into<String>, form_fields: Vec<FormField>) -> Self {
        Self::ModelForm {
            submit_url: submit_url.into(),
            form_fields,
            method: FormMethod::Post,
        }
    }

    /// Navigation instruction: send the client to `url`
    pub fn go_to(url: impl Into<String>) -> Self {
        Self::FireEvent {
            event: Event::go_to(url),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
