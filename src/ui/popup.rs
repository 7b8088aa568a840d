/// Popup UI for Phish Watch extension

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;

use crate::check::CheckResult;
use crate::monitor::Request;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTabUrl() -> Result<JsValue, JsValue>;
}

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    NoData,
    Ready(CheckResult),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);

    // Fetch the cached verdict on mount
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                state.set(load_status().await);
            });
            || ()
        });
    }

    // Retry handler. The monitor acknowledges before classification
    // finishes, so the reload below may still show the previous cached
    // verdict; the fresh one lands in storage shortly after.
    let on_retry = {
        let state = state.clone();

        Callback::from(move |_| {
            let state = state.clone();
            state.set(PopupState::Loading);

            spawn_local(async move {
                if let Err(e) = force_check_active_tab().await {
                    log::warn!("Retry failed: {}", e);
                }
                state.set(load_status().await);
            });
        })
    };

    let is_busy = matches!(*state, PopupState::Loading);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Phish Watch"}</h1>

            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Checking..."}</p>
                    </div>
                },
                PopupState::NoData => html! {
                    <Alert r#type={AlertType::Danger} title={"Error fetching data"} inline={true}>
                    </Alert>
                },
                PopupState::Ready(result) => {
                    let (status_text, status_class) = result.status_line();

                    html! {
                        <div class="result-container">
                            <p class={classes!("status", status_class)}>{status_text}</p>
                            <p class="checked-url">{result.url()}</p>
                            if let Some(confidence) = result.confidence_text() {
                                <p class="confidence">{confidence}</p>
                            }
                        </div>
                    }
                }
            }}

            <Button onclick={on_retry} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                {"🔄 Check Again"}
            </Button>
        </div>
    }
}

// Helper functions

async fn load_status() -> PopupState {
    let message = match serde_wasm_bindgen::to_value(&Request::GetStatus) {
        Ok(message) => message,
        Err(e) => {
            log::error!("Failed to build getStatus message: {}", e);
            return PopupState::NoData;
        }
    };

    match sendMessage(message).await {
        Ok(reply) if !reply.is_undefined() && !reply.is_null() => {
            match serde_wasm_bindgen::from_value::<CheckResult>(reply) {
                Ok(result) => PopupState::Ready(result),
                Err(e) => {
                    log::error!("Failed to parse stored result: {}", e);
                    PopupState::NoData
                }
            }
        }
        Ok(_) => PopupState::NoData,
        Err(e) => {
            log::error!("Failed to fetch status: {:?}", e);
            PopupState::NoData
        }
    }
}

async fn force_check_active_tab() -> Result<(), String> {
    let url = getActiveTabUrl()
        .await
        .map_err(|e| format!("Failed to query active tab: {:?}", e))?;

    // No active tab in the current window; nothing to re-check.
    let Some(url) = url.as_string() else {
        return Ok(());
    };

    let message = serde_wasm_bindgen::to_value(&Request::ForceCheck { url })
        .map_err(|e| format!("Failed to build forceCheck message: {}", e))?;

    sendMessage(message)
        .await
        .map_err(|e| format!("Failed to send forceCheck: {:?}", e))?;

    Ok(())
}
