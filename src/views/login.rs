// ============================================================================
// LOGIN VIEW - Formulario parametrizado por rol (client / livreur)
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use std::cell::RefCell;
use std::rc::Rc;
use crate::dom::{append_child, create_element, on_input_value, set_attribute, set_class_name, text_element, ElementBuilder};
use crate::models::Role;
use crate::state::AppState;
use crate::views::render_header;
use crate::viewmodels::AuthViewModel;

/// Renderizar vista de login
pub fn render_login(state: &AppState, role: Role) -> Result<Element, JsValue> {
    log::info!("🎬 [LOGIN] render_login({:?})", role);

    let screen = ElementBuilder::new("div")?
        .class("login-screen")
        .child(render_header(state, role.title(), true, false)?)?
        .build();

    let form = create_element("form")?;
    set_class_name(&form, "login-form");

    let email_group = create_form_group(
        "email",
        "Email",
        "email",
        "Entrez votre email",
        state.auth.email.clone(),
    )?;
    let password_group = create_form_group(
        "password",
        "Mot de passe",
        "password",
        "Entrez votre mot de passe",
        state.auth.password.clone(),
    )?;
    append_child(&form, &email_group)?;
    append_child(&form, &password_group)?;

    if let Some(error) = state.auth.get_error() {
        append_child(&form, &text_element("p", "form-error", &error)?)?;
    }

    let submitting = state.auth.get_submitting();
    let submit_btn = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-login")
        .text(if submitting { "Connexion..." } else { "Se connecter" })
        .disabled(submitting)?
        .build();
    append_child(&form, &submit_btn)?;

    // Event listener para submit
    {
        let state_clone = state.clone();
        let closure = Closure::wrap(Box::new(move |e: web_sys::Event| {
            e.prevent_default();
            if state_clone.auth.get_submitting() {
                return;
            }
            let email = state_clone.auth.email.borrow().trim().to_string();
            let password = state_clone.auth.password.borrow().clone();

            state_clone.auth.set_submitting(true);
            state_clone.auth.set_error(None);
            state_clone.notify_subscribers();

            let state_clone = state_clone.clone();
            spawn_local(async move {
                let vm = AuthViewModel::new();
                match vm.login(role, &email, &password).await {
                    Ok(session) => {
                        log::info!("✅ [LOGIN] Connecté en tant que {:?}", session.role);
                        vm.start_session(&state_clone, session);
                    }
                    Err(e) => {
                        log::error!("❌ [LOGIN] {}", e);
                        state_clone.auth.password.borrow_mut().clear();
                        state_clone.auth.set_error(Some(e.to_string()));
                        state_clone.auth.set_submitting(false);
                        state_clone.notify_subscribers();
                    }
                }
            });
        }) as Box<dyn FnMut(web_sys::Event)>);

        form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let container = ElementBuilder::new("div")?
        .class("login-container")
        .child(form)?
        .build();
    append_child(&screen, &container)?;

    Ok(screen)
}

/// Helper para crear form group ligado a un campo del estado
fn create_form_group(
    id: &str,
    label_text: &str,
    input_type: &str,
    placeholder: &str,
    value: Rc<RefCell<String>>,
) -> Result<Element, JsValue> {
    let label = ElementBuilder::new("label")?
        .attr("for", id)?
        .text(label_text)
        .build();

    let input = create_element("input")?;
    set_attribute(&input, "type", input_type)?;
    set_attribute(&input, "id", id)?;
    set_attribute(&input, "name", id)?;
    set_attribute(&input, "placeholder", placeholder)?;
    set_attribute(&input, "value", &value.borrow())?;
    if input_type == "email" {
        set_attribute(&input, "autocapitalize", "none")?;
        set_attribute(&input, "autocomplete", "username")?;
    }
    set_class_name(&input, "form-input");

    on_input_value(&input, move |text| {
        *value.borrow_mut() = text;
    })?;

    ElementBuilder::new("div")?
        .class("form-group")
        .child(label)?
        .child(input)
        .map(ElementBuilder::build)
}
