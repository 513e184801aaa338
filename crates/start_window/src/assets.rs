//! Per-render decisions: whether the start date script loads for a form,
//! and what it is handed when it does.
//!
//! Everything the host would otherwise keep in request globals (current
//! screen, post, user) is passed in explicitly.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Config, parse_version};
use crate::disabled_days::{self, DisabledDays};
use crate::hooks::{AdminLoadContext, CommunityLoadContext, Hooks, MinStartContext};
use crate::payload::{ClientWindow, ScriptVars};
use crate::style;
use crate::window::{DateWindow, WindowCalculator, WindowInputs};
use crate::{WindowError, WindowResult};

/// Post type of calendar events.
pub const EVENT_POST_TYPE: &str = "tribe_events";

/// Human-readable extension name used in admin notices.
pub const EXTENSION_NAME: &str = "Custom Datepicker Start Date";

/// The admin screen being rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminScreen {
    /// Screen base, `post` on the add/edit screen.
    pub base: String,
    pub post_type: String,
}

/// The event being added or edited.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Zero for an event that has not been saved yet.
    #[serde(default)]
    pub id: u64,
    /// Persisted start date, in the event's own zone.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// The event's own zone, if it has one.
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderContext {
    AdminEdit { screen: AdminScreen, post: Post },
    CommunityForm {
        #[serde(default)]
        post: Post,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub capabilities: BTreeSet<String>,
}

impl User {
    pub fn with_capabilities<I, S>(caps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capabilities: caps.into_iter().map(Into::into).collect(),
        }
    }

    pub fn can(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

/// What the host enqueues for the form: the script handle and its variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBundle {
    pub handle: String,
    /// Name of the JS object the variables are exposed under.
    pub object_name: String,
    pub vars: ScriptVars,
}

#[derive(Debug)]
pub struct Extension {
    config: Config,
    hooks: Hooks,
    calculator: WindowCalculator,
}

impl Extension {
    pub fn new(config: Config) -> Self {
        Self::with_calculator(config, WindowCalculator::from_env())
    }

    pub fn with_calculator(config: Config, calculator: WindowCalculator) -> Self {
        Self {
            config,
            hooks: Hooks::default(),
            calculator,
        }
    }

    /// Start the extension on a host reporting `host_version`. Hosts older
    /// than the configured minimum get no extension.
    pub fn init(config: Config, host_version: &str) -> WindowResult<Self> {
        check_environment(&config.min_host_version, host_version)?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// Hook name for an extension point, e.g. `<handle>_max_date`.
    pub fn hook_name(&self, point: &str) -> String {
        format!("{}_{}", style::handle_underscores(&self.config.handle), point)
    }

    pub fn error_class(&self) -> String {
        style::error_css_class(&self.config.handle)
    }

    pub fn validation_style(&self) -> String {
        style::validation_style(&self.config.handle)
    }

    /// Capability that exempts a user from the restriction.
    pub fn capability_allowed_any_date(&self) -> String {
        self.hooks
            .cap_allowed_any_start_date
            .apply(self.config.capability.clone(), &())
    }

    pub fn time_zone_for(&self, post: &Post) -> String {
        let zone = post
            .time_zone
            .clone()
            .unwrap_or_else(|| self.config.time_zone.clone());
        self.hooks.time_zone.apply(zone, &post.id)
    }

    pub fn compute_window(&self, post: &Post, now: DateTime<Utc>) -> DateWindow {
        let time_zone = self.time_zone_for(post);
        let min_offset = self
            .hooks
            .min_date_offset
            .apply(self.config.min_offset.clone(), &post.id);
        let max_offset = self
            .hooks
            .max_date
            .apply(self.config.max_offset.clone(), &post.id);

        let inputs = WindowInputs {
            now,
            time_zone: &time_zone,
            existing_start: post.start_date,
            min_offset: &min_offset,
            max_offset: &max_offset,
        };
        let window = self.calculator.compute(&inputs);

        if self.hooks.min_start_timestamp.is_empty() {
            return window;
        }
        let ctx = MinStartContext {
            post_id: post.id,
            existing_start: post
                .start_date
                .map(|d| crate::timezone::midnight_timestamp(d, window.timezone)),
        };
        let min = self
            .hooks
            .min_start_timestamp
            .apply(window.min_timestamp(), &ctx);
        window.with_min_timestamp(min)
    }

    pub fn build_script_vars(&self, post: &Post, now: DateTime<Utc>) -> ScriptVars {
        self.compute_window(post, now)
            .to_script_vars(self.error_class())
    }

    fn bundle(&self, post: &Post, now: DateTime<Utc>) -> AssetBundle {
        AssetBundle {
            handle: self.config.handle.clone(),
            object_name: format!("{}_vars", style::handle_underscores(&self.config.handle)),
            vars: self.build_script_vars(post, now),
        }
    }

    /// Admin add/edit screen for events.
    pub fn load_for_admin_screen(
        &self,
        screen: &AdminScreen,
        post: &Post,
        user: &User,
        now: DateTime<Utc>,
    ) -> Option<AssetBundle> {
        let load = !user.can(&self.capability_allowed_any_date())
            && screen.post_type == EVENT_POST_TYPE
            && screen.base == "post";
        let ctx = AdminLoadContext {
            screen: screen.clone(),
            post: post.clone(),
        };
        let load = self.hooks.load_script_wp_admin.apply(load, &ctx);
        debug!(post_id = post.id, load, "admin screen script decision");
        load.then(|| self.bundle(post, now))
    }

    /// Front-end community event submission form.
    pub fn load_for_community_form(
        &self,
        post: &Post,
        user: &User,
        now: DateTime<Utc>,
    ) -> Option<AssetBundle> {
        let load = !user.can(&self.capability_allowed_any_date());
        let ctx = CommunityLoadContext { post_id: post.id };
        let load = self.hooks.load_script_ce_form.apply(load, &ctx);
        debug!(post_id = post.id, load, "community form script decision");
        load.then(|| self.bundle(post, now))
    }

    pub fn render(
        &self,
        ctx: &RenderContext,
        user: &User,
        now: DateTime<Utc>,
    ) -> Option<AssetBundle> {
        match ctx {
            RenderContext::AdminEdit { screen, post } => {
                self.load_for_admin_screen(screen, post, user, now)
            }
            RenderContext::CommunityForm { post } => self.load_for_community_form(post, user, now),
        }
    }

    /// Block editor calendar: the extension's projection runs first, then
    /// anything registered on the `disabled_days` hook.
    pub fn disabled_days(
        &self,
        prior: Option<DisabledDays>,
        vars: &ScriptVars,
        viewer_tz: Tz,
    ) -> Option<DisabledDays> {
        let Some(window) = ClientWindow::from_vars(vars, viewer_tz) else {
            warn!(min_date = vars.min_date, "payload has no usable minimum");
            return prior;
        };
        let days = disabled_days::filter(prior, &window);
        self.hooks.disabled_days.apply(days, &window)
    }
}

/// Fails with [`WindowError::EnvironmentUnsupported`] when `found` is older
/// than `required` or is not a version at all.
pub fn check_environment(required: &str, found: &str) -> WindowResult<()> {
    let unsupported = || WindowError::EnvironmentUnsupported {
        required: required.to_string(),
        found: found.to_string(),
    };
    let need = parse_version(required).ok_or_else(unsupported)?;
    let have = parse_version(found).ok_or_else(unsupported)?;
    if have < need {
        return Err(unsupported());
    }
    Ok(())
}

/// Admin notice shown instead of the feature when the host is too old.
pub fn admin_notice(err: &WindowError) -> Option<String> {
    match err {
        WindowError::EnvironmentUnsupported { required, found } => Some(format!(
            "<p>{EXTENSION_NAME} requires host runtime {required} or newer to work (found {found}). \
             Please contact your website host and inquire about updating.</p>"
        )),
        _ => None,
    }
}
