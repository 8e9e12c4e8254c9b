use crate::client::HazardClient;
use crate::config::Config;
use crate::model::{
    self, Action, Location, Model, SwitchButton, ZigBeeCluster, ZigBeeClusterCommand, ZigBeeDevice,
    ZigBeeEndpoint, ZigBeeSpec, ZigBeeZdo, command_template,
};
use crate::sort::sort_records;
use crate::statics;
use crate::value::HzValue;
use anyhow::Context;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{error, info};

pub fn run_gui(config: Config) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 800.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| {
            let mut app = HazardApp {
                theme_dark: true,
                server: config.server.clone(),
                ..Default::default()
            };
            app.connect(&config);
            Ok(Box::new(app))
        }),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Things,
    Groups,
    Map,
    Actions,
    ZigBee,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Things, Tab::Groups, Tab::Map, Tab::Actions, Tab::ZigBee];

    fn label(self) -> &'static str {
        match self {
            Tab::Things => statics::EN_TAB_THINGS,
            Tab::Groups => statics::EN_TAB_GROUPS,
            Tab::Map => statics::EN_TAB_MAP,
            Tab::Actions => statics::EN_TAB_ACTIONS,
            Tab::ZigBee => statics::EN_TAB_ZIGBEE,
        }
    }
}

/// Switch button gestures, in the order the code editor shows them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gesture {
    Single,
    Double,
    Tap,
}

impl Gesture {
    const ALL: [Gesture; 3] = [Gesture::Single, Gesture::Double, Gesture::Tap];

    fn label(self) -> &'static str {
        match self {
            Gesture::Single => statics::EN_LABEL_SINGLE,
            Gesture::Double => statics::EN_LABEL_DOUBLE,
            Gesture::Tap => statics::EN_LABEL_TAP,
        }
    }

    fn slot(self, button: &mut SwitchButton) -> &mut Option<String> {
        match self {
            Gesture::Single => &mut button.single,
            Gesture::Double => &mut button.double,
            Gesture::Tap => &mut button.tap,
        }
    }

    fn get(self, button: &SwitchButton) -> &str {
        let code = match self {
            Gesture::Single => &button.single,
            Gesture::Double => &button.double,
            Gesture::Tap => &button.tap,
        };
        code.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq)]
enum CodeTarget {
    Action(i64),
    Clock(i64),
    Button { thing: i64, button: usize },
}

/// Open code editor. One labelled buffer per editable field.
struct CodeEditor {
    target: CodeTarget,
    title: String,
    fields: Vec<(&'static str, String)>,
}

#[derive(Clone, Debug, PartialEq)]
enum RenameTarget {
    Action(i64),
    Button { thing: i64, button: usize },
    Device(String),
}

struct Rename {
    target: RenameTarget,
    buffer: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DeleteTarget {
    Action(i64),
    Thing(i64),
}

#[derive(Clone, Debug)]
enum CommandTarget {
    Zdo {
        cluster_name: String,
    },
    Zcl {
        endpoint: ZigBeeEndpoint,
        cluster: String,
        command: String,
    },
    Bind {
        endpoint: ZigBeeEndpoint,
        cluster: ZigBeeCluster,
    },
}

/// A ZigBee request being composed, and the last response to it.
#[derive(Clone, Debug)]
struct CommandWindow {
    device: ZigBeeDevice,
    target: CommandTarget,
    title: String,
    request: String,
    response: String,
    group: String,
}

impl CommandWindow {
    fn new(
        device: &ZigBeeDevice,
        target: CommandTarget,
        title: String,
        args: &[String],
    ) -> crate::Result<Self> {
        Ok(Self {
            device: device.clone(),
            target,
            title,
            request: command_template(args, device).to_json_pretty()?,
            response: String::new(),
            group: String::new(),
        })
    }

    fn zdo(device: &ZigBeeDevice, zdo: &ZigBeeZdo) -> crate::Result<Self> {
        let target = CommandTarget::Zdo {
            cluster_name: zdo.cluster_name.clone(),
        };
        Self::new(device, target, zdo.cluster_name.clone(), &zdo.args)
    }

    fn zcl(
        device: &ZigBeeDevice,
        endpoint: &ZigBeeEndpoint,
        cluster: &ZigBeeCluster,
        command: &ZigBeeClusterCommand,
    ) -> crate::Result<Self> {
        let target = CommandTarget::Zcl {
            endpoint: endpoint.clone(),
            cluster: cluster.name.clone(),
            command: command.name.clone(),
        };
        let title = format!("{} / {}", cluster.name, command.name);
        Self::new(device, target, title, &command.args)
    }

    fn bind(
        device: &ZigBeeDevice,
        endpoint: &ZigBeeEndpoint,
        cluster: &ZigBeeCluster,
    ) -> crate::Result<Self> {
        let title = format!("{} {}", statics::EN_NODE_BIND, cluster.name);
        let target = CommandTarget::Bind {
            endpoint: endpoint.clone(),
            cluster: cluster.clone(),
        };
        Ok(Self {
            request: String::new(),
            ..Self::new(device, target, title, &[])?
        })
    }
}

#[derive(Clone, Copy, Debug)]
struct MapDrag {
    id: i64,
    offset: egui::Vec2,
}

/// User input collected while drawing a frame, applied once drawing is done.
enum Intent {
    Refresh,
    LoadZigBee,
    OpenThing(i64),
    ThingAction {
        id: i64,
        action: &'static str,
        data: Option<HzValue>,
    },
    InvokeButton {
        thing: i64,
        button: usize,
    },
    RenameThing {
        id: i64,
        name: String,
    },
    MoveThing {
        id: i64,
        location: Location,
    },
    Reconfigure,
    InvokeAction(i64),
    NewAction,
    ConfirmDelete(DeleteTarget),
    Delete(DeleteTarget),
    EditCode(CodeTarget),
    ApplyCode,
    StartRename(RenameTarget),
    ApplyRename,
    SelectDevice(String),
    LoadEndpoints,
    CreateThing {
        addr64: String,
        kind: String,
    },
    OpenCommand(crate::Result<CommandWindow>),
    SendCommand,
}

/// The control panel: cached backend state plus the open windows.
#[derive(Default)]
struct HazardApp {
    client: Option<HazardClient>,
    server: String,
    tab: Tab,

    // Backend state, sorted for display when loaded.
    things: Vec<Model>,
    actions: Vec<Action>,
    devices: Vec<ZigBeeDevice>,
    thing_types: Vec<String>,
    spec: Option<ZigBeeSpec>,
    zigbee_loaded: bool,

    // Thing window.
    open_thing: Option<i64>,
    thing_name: String,

    // Dialogs.
    code_editor: Option<CodeEditor>,
    rename: Option<Rename>,
    confirm_delete: Option<DeleteTarget>,
    command: Option<CommandWindow>,

    // Map.
    map_zone: Option<String>,
    map_edit: bool,
    map_drag: Option<MapDrag>,

    // ZigBee explorer.
    selected_device: Option<String>,
    endpoints: Vec<ZigBeeEndpoint>,
    create_thing_type: String,

    status: String,
    last_error: Option<String>,
    theme_dark: bool,
}

impl HazardApp {
    fn connect(&mut self, config: &Config) {
        let result = HazardClient::new(config, Arc::new(model::registry()))
            .context(statics::EN_OP_CONNECT);
        if let Some(client) = self.report(result, statics::EN_STATUS_LOADED) {
            info!(server = %client.server(), "connected");
            self.client = Some(client);
            self.refresh();
        }
    }

    fn client(&self) -> anyhow::Result<&HazardClient> {
        self.client.as_ref().context(statics::EN_ERR_NOT_CONNECTED)
    }

    /// Record the outcome of a backend call in the status or error bar.
    fn report<T>(&mut self, result: anyhow::Result<T>, done: &str) -> Option<T> {
        match result {
            Ok(v) => {
                self.status = done.to_string();
                Some(v)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    fn fail(&mut self, e: anyhow::Error) {
        error!("{e:#}");
        self.last_error = Some(format!("{e:#}"));
    }

    fn refresh(&mut self) {
        let things = self.client().and_then(load_things);
        if let Some(things) = self.report(things, statics::EN_STATUS_LOADED) {
            self.things = things;
        }
        let actions = self.client().and_then(load_actions);
        if let Some(actions) = self.report(actions, statics::EN_STATUS_LOADED) {
            self.actions = actions;
        }
        if self.zigbee_loaded {
            self.load_zigbee();
        }
    }

    fn load_zigbee(&mut self) {
        self.zigbee_loaded = true;
        let loaded = self.client().and_then(|c| {
            let mut devices = c.zigbee_devices().context(statics::EN_OP_LOAD_DEVICES)?;
            sort_records(&mut devices, [statics::FIELD_NAME]);
            let types = c.thing_types().context(statics::EN_OP_LOAD_THING_TYPES)?;
            let spec = c.zigbee_spec().context(statics::EN_OP_LOAD_SPEC)?;
            Ok((devices, types, spec))
        });
        if let Some((devices, types, spec)) = self.report(loaded, statics::EN_STATUS_LOADED) {
            self.devices = devices;
            self.thing_types = types;
            self.spec = Some(spec);
        }
    }

    fn thing_index(&self, id: i64) -> Option<usize> {
        self.things.iter().position(|m| m.id() == Some(id))
    }

    fn action_index(&self, id: i64) -> Option<usize> {
        self.actions.iter().position(|a| a.id == Some(id))
    }

    fn device(&self, addr64: &str) -> Option<&ZigBeeDevice> {
        self.devices.iter().find(|d| d.addr64() == addr64)
    }

    fn switch_button(&self, thing: i64, button: usize) -> Option<&SwitchButton> {
        match self.things.iter().find(|m| m.id() == Some(thing))? {
            Model::Switch(s) => s.buttons().get(button),
            _ => None,
        }
    }

    /// Apply `edit` to the cached thing, post it, and keep the backend's copy.
    fn update_thing(&mut self, id: i64, edit: impl FnOnce(&mut Model)) {
        let Some(pos) = self.thing_index(id) else {
            return;
        };
        edit(&mut self.things[pos]);
        let result = self.client().and_then(|c| {
            c.save_thing(&self.things[pos])
                .context(statics::EN_OP_SAVE_THING)
        });
        if let Some(Some(saved)) = self.report(result, statics::EN_STATUS_SAVED) {
            self.things[pos] = saved;
        }
    }

    fn update_action(&mut self, id: i64, edit: impl FnOnce(&mut Action)) {
        let Some(pos) = self.action_index(id) else {
            return;
        };
        edit(&mut self.actions[pos]);
        let result = self.client().and_then(|c| {
            c.save_action(&self.actions[pos])
                .context(statics::EN_OP_SAVE_ACTION)
        });
        if let Some(saved) = self.report(result, statics::EN_STATUS_SAVED) {
            self.actions[pos] = saved;
        }
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Refresh => self.refresh(),
            Intent::LoadZigBee => self.load_zigbee(),
            Intent::OpenThing(id) => {
                self.thing_name = self
                    .things
                    .iter()
                    .find(|m| m.id() == Some(id))
                    .and_then(Model::thing)
                    .and_then(|t| t.name.clone())
                    .unwrap_or_default();
                self.open_thing = Some(id);
            }
            Intent::ThingAction { id, action, data } => {
                let result = self.client().and_then(|c| {
                    c.thing_action(id, action, data.as_ref())
                        .with_context(|| format!("{} {action}", statics::EN_OP_THING_ACTION))
                });
                if self.report(result, statics::EN_STATUS_SENT).is_some()
                    && matches!(
                        action,
                        statics::THING_ACTION_ON
                            | statics::THING_ACTION_OFF
                            | statics::THING_ACTION_TOGGLE
                    )
                {
                    let things = self.client().and_then(load_things);
                    if let Some(things) = self.report(things, statics::EN_STATUS_SENT) {
                        self.things = things;
                    }
                }
            }
            Intent::InvokeButton { thing, button } => {
                let data = self.switch_button(thing, button).map(|b| {
                    let mut data = HzValue::object();
                    data.insert(statics::FIELD_CODE, HzValue::encode(&b.code)?);
                    Ok::<_, crate::HazardError>(data)
                });
                let Some(data) = data else {
                    return;
                };
                let result = data.context(statics::EN_OP_THING_ACTION).and_then(|data| {
                    self.client()?
                        .thing_action(thing, statics::THING_ACTION_INVOKE, Some(&data))
                        .context(statics::EN_OP_THING_ACTION)
                });
                self.report(result, statics::EN_STATUS_SENT);
            }
            Intent::RenameThing { id, name } => self.update_thing(id, |m| {
                if let Some(t) = m.thing_mut() {
                    t.name = Some(name);
                }
            }),
            Intent::MoveThing { id, location } => self.update_thing(id, |m| {
                if let Some(t) = m.thing_mut() {
                    t.location = Some(location);
                }
            }),
            Intent::Reconfigure => {
                let result = self
                    .client()
                    .and_then(|c| c.reconfigure().context(statics::EN_OP_RECONFIGURE));
                if self.report(result, statics::EN_STATUS_SENT).is_some() {
                    self.refresh();
                }
            }
            Intent::InvokeAction(id) => {
                let result = self
                    .client()
                    .and_then(|c| c.invoke_action(id).context(statics::EN_OP_INVOKE_ACTION));
                self.report(result, statics::EN_STATUS_SENT);
            }
            Intent::NewAction => {
                let result = self
                    .client()
                    .and_then(|c| c.create_action().context(statics::EN_OP_CREATE_ACTION));
                if let Some(action) = self.report(result, statics::EN_STATUS_CREATED) {
                    let id = action.id;
                    self.actions.push(action);
                    sort_records(&mut self.actions, [statics::FIELD_NAME]);
                    if let Some(id) = id {
                        self.open_code_editor(CodeTarget::Action(id));
                    }
                }
            }
            Intent::ConfirmDelete(target) => self.confirm_delete = Some(target),
            Intent::Delete(DeleteTarget::Action(id)) => {
                let result = self
                    .client()
                    .and_then(|c| c.remove_action(id).context(statics::EN_OP_REMOVE_ACTION));
                if self.report(result, statics::EN_STATUS_REMOVED).is_some() {
                    self.actions.retain(|a| a.id != Some(id));
                }
            }
            Intent::Delete(DeleteTarget::Thing(id)) => {
                let result = self
                    .client()
                    .and_then(|c| c.remove_thing(id).context(statics::EN_OP_REMOVE_THING));
                if self.report(result, statics::EN_STATUS_REMOVED).is_some() {
                    self.things.retain(|m| m.id() != Some(id));
                    if self.open_thing == Some(id) {
                        self.open_thing = None;
                    }
                }
            }
            Intent::EditCode(target) => self.open_code_editor(target),
            Intent::ApplyCode => self.apply_code(),
            Intent::StartRename(target) => {
                let current = match &target {
                    RenameTarget::Action(id) => self
                        .action_index(*id)
                        .and_then(|i| self.actions[i].name.clone()),
                    RenameTarget::Button { thing, button } => self
                        .switch_button(*thing, *button)
                        .and_then(|b| b.name.clone()),
                    RenameTarget::Device(addr64) => {
                        self.device(addr64).and_then(|d| d.name.clone())
                    }
                };
                self.rename = Some(Rename {
                    target,
                    buffer: current.unwrap_or_default(),
                });
            }
            Intent::ApplyRename => self.apply_rename(),
            Intent::SelectDevice(addr64) => {
                if self.selected_device.as_deref() != Some(addr64.as_str()) {
                    self.endpoints.clear();
                }
                self.selected_device = Some(addr64);
            }
            Intent::LoadEndpoints => {
                let Some(addr64) = self.selected_device.clone() else {
                    return;
                };
                let result = self.client().and_then(|c| {
                    let device = self.device(&addr64).context(statics::EN_NO_DEVICE_SELECTED)?;
                    let spec = self.spec.as_ref().context(statics::EN_NO_SPEC)?;
                    c.endpoints(device, spec)
                        .context(statics::EN_OP_LOAD_ENDPOINTS)
                });
                if let Some(endpoints) = self.report(result, statics::EN_STATUS_LOADED) {
                    self.endpoints = endpoints;
                }
            }
            Intent::CreateThing { addr64, kind } => {
                let result = self.client().and_then(|c| {
                    let device = self.device(&addr64).context(statics::EN_NO_DEVICE_SELECTED)?;
                    c.create_thing_from_device(device, &kind)
                        .with_context(|| format!("{} {kind}", statics::EN_OP_CREATE_THING))
                });
                if self.report(result, statics::EN_STATUS_CREATED).is_some() {
                    let things = self.client().and_then(load_things);
                    if let Some(things) = self.report(things, statics::EN_STATUS_CREATED) {
                        self.things = things;
                    }
                }
            }
            Intent::OpenCommand(window) => match window {
                Ok(window) => self.command = Some(window),
                Err(e) => self.fail(anyhow::Error::new(e).context(statics::EN_OP_OPEN_COMMAND)),
            },
            Intent::SendCommand => self.send_command(),
        }
    }

    fn open_code_editor(&mut self, target: CodeTarget) {
        let editor = match &target {
            CodeTarget::Action(id) => self.action_index(*id).map(|i| {
                let action = &self.actions[i];
                (
                    format!("{}: {}", statics::EN_WINDOW_ACTION_CODE, action.display_name()),
                    vec![(
                        statics::EN_LABEL_CODE,
                        action.code.clone().unwrap_or_default(),
                    )],
                )
            }),
            CodeTarget::Clock(id) => match self.things.iter().find(|m| m.id() == Some(*id)) {
                Some(Model::Clock(clock)) => Some((
                    format!("{}: {}", statics::EN_LABEL_CODE, clock.base.display_name()),
                    vec![
                        (
                            statics::EN_LABEL_INTERVAL,
                            clock.interval.map(|i| i.to_string()).unwrap_or_default(),
                        ),
                        (statics::EN_LABEL_CODE, clock.code.clone().unwrap_or_default()),
                    ],
                )),
                _ => None,
            },
            CodeTarget::Button { thing, button } => {
                self.switch_button(*thing, *button).map(|b| {
                    let fields: Vec<_> = Gesture::ALL
                        .iter()
                        .map(|g| (g.label(), g.get(b).to_string()))
                        .collect();
                    (
                        format!("{}: {}", statics::EN_WINDOW_BUTTON_CODE, b.display_name()),
                        fields,
                    )
                })
            }
        };
        self.code_editor = editor.map(|(title, fields)| CodeEditor {
            target,
            title,
            fields,
        });
    }

    fn apply_code(&mut self) {
        let Some(CodeEditor { target, fields, .. }) = self.code_editor.take() else {
            return;
        };
        let field = |i: usize| fields.get(i).map(|(_, s)| s.clone()).unwrap_or_default();
        match target {
            CodeTarget::Action(id) => {
                let code = field(0);
                self.update_action(id, |a| a.code = Some(code));
            }
            CodeTarget::Clock(id) => {
                let interval = match parse_interval(&field(0)) {
                    Ok(interval) => interval,
                    Err(e) => {
                        self.fail(e);
                        return;
                    }
                };
                let code = field(1);
                self.update_thing(id, |m| {
                    if let Model::Clock(clock) = m {
                        clock.interval = interval;
                        clock.code = Some(code);
                    }
                });
            }
            CodeTarget::Button { thing, button } => {
                let codes: Vec<String> = (0..Gesture::ALL.len()).map(field).collect();
                self.update_thing(thing, |m| {
                    if let Some(b) = switch_button_mut(m, button) {
                        for (gesture, code) in Gesture::ALL.iter().zip(codes) {
                            *gesture.slot(b) = Some(code);
                        }
                    }
                });
            }
        }
    }

    fn apply_rename(&mut self) {
        let Some(Rename { target, buffer }) = self.rename.take() else {
            return;
        };
        let name = buffer.trim().to_string();
        match target {
            RenameTarget::Action(id) => self.update_action(id, |a| a.name = Some(name)),
            RenameTarget::Button { thing, button } => self.update_thing(thing, |m| {
                if let Some(b) = switch_button_mut(m, button) {
                    b.name = Some(name);
                }
            }),
            RenameTarget::Device(addr64) => {
                let Some(pos) = self.devices.iter().position(|d| d.addr64() == addr64) else {
                    return;
                };
                let mut device = self.devices[pos].clone();
                let result = self.client().and_then(|c| {
                    c.rename_device(&mut device, &name)
                        .context(statics::EN_OP_RENAME_DEVICE)
                });
                if self.report(result, statics::EN_STATUS_SAVED).is_some() {
                    self.devices[pos] = device;
                }
            }
        }
    }

    fn send_command(&mut self) {
        let Some(window) = self.command.as_ref() else {
            return;
        };
        let result = self.client().and_then(|c| {
            let device = &window.device;
            let sent = match &window.target {
                CommandTarget::Zdo { cluster_name } => {
                    let data = HzValue::parse(&window.request).context(statics::EN_ERR_REQUEST_JSON)?;
                    c.send_zdo(device, cluster_name, &data)
                }
                CommandTarget::Zcl {
                    endpoint,
                    cluster,
                    command,
                } => {
                    let data = HzValue::parse(&window.request).context(statics::EN_ERR_REQUEST_JSON)?;
                    match parse_group(&window.group)? {
                        Some(group) => {
                            c.send_group_zcl_cluster(group, endpoint, cluster, command, &data)
                        }
                        None => c.send_zcl_cluster(device, endpoint, cluster, command, &data),
                    }
                }
                CommandTarget::Bind { endpoint, cluster } => {
                    let response = c
                        .bind_to_coordinator(device, endpoint, cluster)
                        .context(statics::EN_OP_BIND)?;
                    return Ok(response.to_json_pretty()?);
                }
            };
            let response = sent
                .with_context(|| format!("{} {}", statics::EN_OP_SEND_COMMAND, window.title))?;
            Ok(response.to_json_pretty()?)
        });
        if let Some(response) = self.report(result, statics::EN_STATUS_SENT)
            && let Some(window) = self.command.as_mut()
        {
            window.response = response;
        }
    }

    fn show_thing_list(&self, ui: &mut egui::Ui, groups: bool, intents: &mut Vec<Intent>) {
        let row_h = 30.0;
        let mut zone: Option<Option<&str>> = None;
        let mut any = false;

        ui.push_id(("thing_list", groups), |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for model in &self.things {
                        let Some(thing) = model.thing() else {
                            continue;
                        };
                        let Some(id) = thing.id else {
                            continue;
                        };
                        if thing.has_feature(statics::FEATURE_GROUP) != groups {
                            continue;
                        }
                        any = true;

                        let this_zone = thing.zone.as_deref();
                        if zone != Some(this_zone) {
                            ui.add_space(6.0);
                            ui.strong(this_zone.unwrap_or(statics::EN_NO_ZONE));
                            zone = Some(this_zone);
                        }

                        ui.horizontal(|ui| {
                            let is_light = thing.has_feature(statics::FEATURE_LIGHT);
                            let glyph = glyph_text(model, 20.0);
                            if ui.add(egui::Button::new(glyph).frame(false)).clicked() {
                                intents.push(if is_light {
                                    Intent::ThingAction {
                                        id,
                                        action: statics::THING_ACTION_TOGGLE,
                                        data: None,
                                    }
                                } else {
                                    Intent::OpenThing(id)
                                });
                            }
                            let selected = self.open_thing == Some(id);
                            if selectable_row_left(ui, selected, &thing_summary(model), row_h)
                                .clicked()
                            {
                                intents.push(Intent::OpenThing(id));
                            }
                        });
                    }
                    if !any {
                        ui.label(statics::EN_NO_THINGS);
                    }
                });
        });
    }

    fn show_thing_window(&mut self, ctx: &egui::Context, intents: &mut Vec<Intent>) {
        let Some(id) = self.open_thing else {
            return;
        };
        let Some(pos) = self.thing_index(id) else {
            self.open_thing = None;
            return;
        };

        let mut open = true;
        let mut close = false;
        let name = &mut self.thing_name;
        let model = &mut self.things[pos];
        let title = model
            .thing()
            .map(|t| t.display_name().to_string())
            .unwrap_or_default();

        egui::Window::new(title)
            .id(egui::Id::new(("thing_window", id)))
            .collapsible(false)
            .default_width(420.0)
            .open(&mut open)
            .show(ctx, |ui| {
                thing_controls(ui, id, model, name, intents);
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_CLOSE).clicked() {
                        close = true;
                    }
                    if ui.button(statics::EN_BTN_DELETE).clicked() {
                        intents.push(Intent::ConfirmDelete(DeleteTarget::Thing(id)));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(statics::EN_BTN_RECONFIGURE).clicked() {
                            intents.push(Intent::Reconfigure);
                        }
                    });
                });
            });

        if !open || close {
            self.open_thing = None;
        }
    }

    fn show_map(&mut self, ui: &mut egui::Ui, intents: &mut Vec<Intent>) {
        let zones = zones(&self.things);
        if zones.is_empty() {
            ui.label(statics::EN_NO_ZONES);
            return;
        }
        if self
            .map_zone
            .as_ref()
            .is_none_or(|z| !zones.contains(z))
        {
            self.map_zone = zones.first().cloned();
        }

        ui.horizontal(|ui| {
            ui.label(statics::EN_LABEL_ZONE);
            for z in &zones {
                ui.selectable_value(&mut self.map_zone, Some(z.clone()), z.as_str());
            }
            ui.separator();
            ui.checkbox(&mut self.map_edit, statics::EN_LABEL_EDIT);
            if self.map_edit {
                ui.weak(statics::EN_DRAG_HINT);
            }
        });
        ui.separator();

        let (canvas, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let origin = canvas.rect.min;
        let visuals = ui.visuals().clone();

        if self.map_edit {
            let stroke = egui::Stroke::new(1.0, visuals.faint_bg_color);
            let mut x = canvas.rect.left();
            while x < canvas.rect.right() {
                painter.vline(x, canvas.rect.y_range(), stroke);
                x += statics::MAP_GRID;
            }
            let mut y = canvas.rect.top();
            while y < canvas.rect.bottom() {
                painter.hline(canvas.rect.x_range(), y, stroke);
                y += statics::MAP_GRID;
            }
        }

        let things = &self.things;
        let drag = &mut self.map_drag;
        for model in things {
            let Some(thing) = model.thing() else {
                continue;
            };
            let Some(id) = thing.id else {
                continue;
            };
            if thing.zone != self.map_zone {
                continue;
            }

            let stored = thing.location_or_origin();
            let shown = match drag {
                Some(d) if d.id == id => snap_location(stored, d.offset),
                _ => stored,
            };
            let min = origin + egui::vec2(shown.x as f32, shown.y as f32);
            let rect = egui::Rect::from_min_size(min, egui::Vec2::splat(statics::MAP_MARKER_SIZE));
            let sense = if self.map_edit {
                egui::Sense::drag()
            } else {
                egui::Sense::click()
            };
            let response = ui
                .interact(rect, ui.id().with(("map_marker", id)), sense)
                .on_hover_text(thing.display_name());

            if self.map_edit {
                if response.drag_started() {
                    *drag = Some(MapDrag {
                        id,
                        offset: egui::Vec2::ZERO,
                    });
                }
                if let Some(d) = drag.as_mut()
                    && d.id == id
                {
                    d.offset += response.drag_delta();
                    if response.drag_stopped() {
                        let location = snap_location(stored, d.offset);
                        *drag = None;
                        if location != stored {
                            intents.push(Intent::MoveThing { id, location });
                        }
                    }
                }
            } else if response.clicked() {
                intents.push(Intent::OpenThing(id));
            }

            let fill = if model.light().is_some_and(|l| l.is_on()) {
                egui::Color32::ORANGE
            } else {
                visuals.widgets.inactive.bg_fill
            };
            let radius = statics::MAP_MARKER_SIZE / 2.0;
            painter.circle_filled(rect.center(), radius, fill);
            painter.circle_stroke(rect.center(), radius, visuals.widgets.inactive.bg_stroke);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                glyph(model),
                egui::FontId::proportional(20.0),
                visuals.text_color(),
            );
            painter.text(
                rect.center_bottom() + egui::vec2(0.0, 2.0),
                egui::Align2::CENTER_TOP,
                thing.display_name(),
                egui::TextStyle::Small.resolve(ui.style()),
                visuals.text_color(),
            );
        }
    }

    fn show_actions(&self, ui: &mut egui::Ui, intents: &mut Vec<Intent>) {
        let row_h = 26.0;
        ui.push_id("actions_scroll", |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if self.actions.is_empty() {
                        ui.label(statics::EN_NO_ACTIONS);
                    }
                    for action in &self.actions {
                        let Some(id) = action.id else {
                            continue;
                        };
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button(statics::EN_BTN_DELETE).clicked() {
                                intents.push(Intent::ConfirmDelete(DeleteTarget::Action(id)));
                            }
                            if ui.small_button(statics::EN_BTN_RENAME).clicked() {
                                intents.push(Intent::StartRename(RenameTarget::Action(id)));
                            }
                            if ui.small_button(statics::EN_BTN_EDIT_CODE).clicked() {
                                intents.push(Intent::EditCode(CodeTarget::Action(id)));
                            }
                            if selectable_row_left(ui, false, action.display_name(), row_h)
                                .on_hover_text(statics::EN_BTN_INVOKE)
                                .clicked()
                            {
                                intents.push(Intent::InvokeAction(id));
                            }
                        });
                    }
                    ui.add_space(8.0);
                    if ui.button(statics::EN_BTN_ADD_NEW).clicked() {
                        intents.push(Intent::NewAction);
                    }
                });
        });
    }

    fn show_zigbee(&mut self, ui: &mut egui::Ui, intents: &mut Vec<Intent>) {
        if !self.zigbee_loaded {
            intents.push(Intent::LoadZigBee);
        }

        egui::SidePanel::left("zigbee_devices")
            .resizable(true)
            .default_width(460.0)
            .show_inside(ui, |ui| {
                if self.devices.is_empty() {
                    ui.label(statics::EN_NO_DEVICES);
                    return;
                }
                let row_h = 22.0;
                TableBuilder::new(ui)
                    .striped(true)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::initial(160.0).resizable(true))
                    .column(Column::initial(180.0).resizable(true))
                    .column(Column::remainder())
                    .header(row_h, |mut header| {
                        header.col(|ui| {
                            ui.strong(statics::EN_COL_NAME);
                        });
                        header.col(|ui| {
                            ui.strong(statics::EN_COL_ADDR64);
                        });
                        header.col(|ui| {
                            ui.strong(statics::EN_COL_ADDR16);
                        });
                    })
                    .body(|mut body| {
                        for device in &self.devices {
                            body.row(row_h, |mut row| {
                                row.col(|ui| {
                                    let selected =
                                        self.selected_device.as_deref() == Some(device.addr64());
                                    if ui
                                        .selectable_label(selected, device.display_name())
                                        .clicked()
                                    {
                                        intents.push(Intent::SelectDevice(
                                            device.addr64().to_string(),
                                        ));
                                    }
                                });
                                row.col(|ui| {
                                    ui.monospace(device.addr64());
                                });
                                row.col(|ui| {
                                    ui.monospace(device.addr16());
                                });
                            });
                        }
                    });
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            let Some(device) = self
                .selected_device
                .as_deref()
                .and_then(|a| self.devices.iter().find(|d| d.addr64() == a))
            else {
                ui.label(statics::EN_NO_DEVICE_SELECTED);
                return;
            };
            let addr64 = device.addr64().to_string();

            ui.horizontal(|ui| {
                ui.heading(device.display_name());
                if ui.small_button(statics::EN_BTN_RENAME).clicked() {
                    intents.push(Intent::StartRename(RenameTarget::Device(addr64.clone())));
                }
            });
            ui.horizontal(|ui| {
                egui::ComboBox::from_label(statics::EN_LABEL_THING_TYPE)
                    .selected_text(self.create_thing_type.as_str())
                    .show_ui(ui, |ui| {
                        for kind in &self.thing_types {
                            ui.selectable_value(&mut self.create_thing_type, kind.clone(), kind.as_str());
                        }
                    });
                let can_create = !self.create_thing_type.is_empty();
                if ui
                    .add_enabled(can_create, egui::Button::new(statics::EN_BTN_CREATE_THING))
                    .clicked()
                {
                    intents.push(Intent::CreateThing {
                        addr64: addr64.clone(),
                        kind: self.create_thing_type.clone(),
                    });
                }
            });
            ui.separator();

            let Some(spec) = &self.spec else {
                ui.label(statics::EN_NO_SPEC);
                return;
            };
            if ui.button(statics::EN_BTN_LOAD_ENDPOINTS).clicked() {
                intents.push(Intent::LoadEndpoints);
            }

            ui.push_id("zigbee_tree", |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        egui::CollapsingHeader::new(statics::EN_NODE_ENDPOINTS)
                            .default_open(true)
                            .show(ui, |ui| {
                                if self.endpoints.is_empty() {
                                    ui.weak(statics::EN_NO_ENDPOINTS);
                                }
                                for ep in &self.endpoints {
                                    endpoint_tree(ui, device, ep, spec, intents);
                                }
                            });
                        egui::CollapsingHeader::new(statics::EN_NODE_ZDO).show(ui, |ui| {
                            for zdo in &spec.zdo {
                                if ui.button(zdo.cluster_name.as_str()).clicked() {
                                    intents.push(Intent::OpenCommand(CommandWindow::zdo(device, zdo)));
                                }
                            }
                        });
                    });
            });
        });
    }

    fn show_dialogs(&mut self, ctx: &egui::Context, intents: &mut Vec<Intent>) {
        if let Some(editor) = self.code_editor.as_mut() {
            let mut open = true;
            let mut cancel = false;
            egui::Window::new(editor.title.as_str())
                .id(egui::Id::new("code_editor"))
                .collapsible(false)
                .default_width(560.0)
                .open(&mut open)
                .show(ctx, |ui| {
                    for (label, buffer) in editor.fields.iter_mut() {
                        ui.label(*label);
                        ui.add(
                            egui::TextEdit::multiline(buffer)
                                .font(egui::TextStyle::Monospace)
                                .desired_rows(6)
                                .desired_width(f32::INFINITY),
                        );
                    }
                    ui.horizontal(|ui| {
                        if ui.button(statics::EN_BTN_OK).clicked() {
                            intents.push(Intent::ApplyCode);
                        }
                        if ui.button(statics::EN_BTN_CANCEL).clicked() {
                            cancel = true;
                        }
                    });
                });
            if !open || cancel {
                self.code_editor = None;
            }
        }

        if let Some(rename) = self.rename.as_mut() {
            let mut open = true;
            let mut cancel = false;
            egui::Window::new(statics::EN_WINDOW_RENAME)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    let response = ui.text_edit_singleline(&mut rename.buffer);
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    ui.horizontal(|ui| {
                        if ui.button(statics::EN_BTN_OK).clicked() || submitted {
                            intents.push(Intent::ApplyRename);
                        }
                        if ui.button(statics::EN_BTN_CANCEL).clicked() {
                            cancel = true;
                        }
                    });
                });
            if !open || cancel {
                self.rename = None;
            }
        }

        if let Some(target) = self.confirm_delete {
            let name = match target {
                DeleteTarget::Action(id) => self
                    .action_index(id)
                    .map(|i| self.actions[i].display_name().to_string()),
                DeleteTarget::Thing(id) => self
                    .things
                    .iter()
                    .find(|m| m.id() == Some(id))
                    .and_then(Model::thing)
                    .map(|t| t.display_name().to_string()),
            }
            .unwrap_or_else(|| statics::EN_UNNAMED.to_string());

            let mut open = true;
            let mut done = false;
            egui::Window::new(statics::EN_WINDOW_CONFIRM_DELETE)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(format!("{} {name}?", statics::EN_LABEL_DELETE_PROMPT));
                    ui.horizontal(|ui| {
                        if ui.button(statics::EN_BTN_DELETE).clicked() {
                            intents.push(Intent::Delete(target));
                            done = true;
                        }
                        if ui.button(statics::EN_BTN_CANCEL).clicked() {
                            done = true;
                        }
                    });
                });
            if !open || done {
                self.confirm_delete = None;
            }
        }

        if let Some(window) = self.command.as_mut() {
            let mut open = true;
            egui::Window::new(format!("{}: {}", statics::EN_WINDOW_COMMAND, window.title))
                .id(egui::Id::new("command_window"))
                .collapsible(false)
                .default_width(520.0)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(window.device.display_name());
                    match &window.target {
                        CommandTarget::Bind { .. } => {
                            ui.label(statics::EN_LABEL_BIND);
                        }
                        target => {
                            if matches!(target, CommandTarget::Zcl { .. }) {
                                ui.horizontal(|ui| {
                                    ui.label(statics::EN_LABEL_GROUP);
                                    ui.text_edit_singleline(&mut window.group);
                                });
                            }
                            ui.label(statics::EN_LABEL_REQUEST_JSON);
                            ui.add(
                                egui::TextEdit::multiline(&mut window.request)
                                    .font(egui::TextStyle::Monospace)
                                    .desired_rows(8)
                                    .desired_width(f32::INFINITY),
                            );
                        }
                    }
                    if ui.button(statics::EN_BTN_SEND).clicked() {
                        intents.push(Intent::SendCommand);
                    }
                    ui.separator();
                    ui.label(statics::EN_LABEL_RESPONSE_JSON);
                    ui.add(
                        egui::TextEdit::multiline(&mut window.response.as_str())
                            .font(egui::TextStyle::Monospace)
                            .desired_rows(8)
                            .desired_width(f32::INFINITY),
                    );
                });
            if !open {
                self.command = None;
            }
        }
    }
}

fn load_things(client: &HazardClient) -> anyhow::Result<Vec<Model>> {
    let mut things = client.things().context(statics::EN_OP_LOAD_THINGS)?;
    sort_records(
        &mut things,
        [statics::FIELD_ZONE, statics::FIELD_TYPE, statics::FIELD_NAME],
    );
    Ok(things)
}

fn load_actions(client: &HazardClient) -> anyhow::Result<Vec<Action>> {
    let mut actions = client.actions().context(statics::EN_OP_LOAD_ACTIONS)?;
    sort_records(&mut actions, [statics::FIELD_NAME]);
    Ok(actions)
}

fn switch_button_mut(model: &mut Model, button: usize) -> Option<&mut SwitchButton> {
    match model {
        Model::Switch(s) => s.buttons.as_mut()?.get_mut(button),
        _ => None,
    }
}

/// Empty text clears the interval.
fn parse_interval(text: &str) -> anyhow::Result<Option<i64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let secs = text
        .parse::<i64>()
        .with_context(|| format!("{}: {text:?}", statics::EN_ERR_INTERVAL))?;
    Ok(Some(secs))
}

/// Empty text sends to the device rather than a group.
fn parse_group(text: &str) -> anyhow::Result<Option<i64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let group = text
        .parse::<i64>()
        .with_context(|| format!("{}: {text:?}", statics::EN_ERR_GROUP))?;
    Ok(Some(group))
}

fn snap(v: f64) -> f64 {
    let grid = f64::from(statics::MAP_GRID);
    (v / grid).round() * grid
}

/// Location after dragging by `offset`, snapped to the map grid and kept on the map.
fn snap_location(from: Location, offset: egui::Vec2) -> Location {
    Location {
        x: snap(from.x + f64::from(offset.x)).max(0.0),
        y: snap(from.y + f64::from(offset.y)).max(0.0),
    }
}

/// Zones in list order, without repeats. Things are already sorted by zone.
fn zones(things: &[Model]) -> Vec<String> {
    let mut zones: Vec<String> = Vec::new();
    for zone in things.iter().filter_map(|m| m.thing()?.zone.as_deref()) {
        if !zones.iter().any(|z| z == zone) {
            zones.push(zone.to_string());
        }
    }
    zones
}

fn glyph(model: &Model) -> &'static str {
    let Some(thing) = model.thing() else {
        return statics::EN_GLYPH_THING;
    };
    if thing.has_feature(statics::FEATURE_GROUP) {
        statics::EN_GLYPH_GROUP
    } else if thing.has_feature(statics::FEATURE_LIGHT) {
        statics::EN_GLYPH_LIGHT
    } else if thing.has_feature(statics::FEATURE_SWITCH) {
        statics::EN_GLYPH_SWITCH
    } else if thing.has_feature(statics::FEATURE_CLOCK) {
        statics::EN_GLYPH_CLOCK
    } else if thing.has_feature(statics::FEATURE_TEMPERATURE) {
        statics::EN_GLYPH_TEMPERATURE
    } else {
        statics::EN_GLYPH_THING
    }
}

fn glyph_text(model: &Model, size: f32) -> egui::RichText {
    let text = egui::RichText::new(glyph(model)).size(size);
    if model.light().is_some_and(|l| l.is_on()) {
        text.color(egui::Color32::ORANGE)
    } else {
        text
    }
}

/// List label: name plus the most useful reading for the thing's kind.
fn thing_summary(model: &Model) -> String {
    let name = model.thing().map(|t| t.display_name()).unwrap_or_default();
    match model {
        Model::Light(_) | Model::LightGroup(_) => match model.light() {
            Some(l) if l.is_on() => match l.level {
                Some(level) => format!("{name}  {:.0}%", level * 100.0),
                None => format!("{name}  {}", statics::EN_BTN_ON),
            },
            _ => format!("{name}  {}", statics::EN_BTN_OFF),
        },
        Model::Temperature(t) => match t.temperature {
            Some(c) => format!("{name}  {c:.1} {}", statics::EN_UNIT_CELSIUS),
            None => name.to_string(),
        },
        _ => name.to_string(),
    }
}

/// Slider over an optional reading. Returns the value to send once the user lets go.
fn feature_slider(
    ui: &mut egui::Ui,
    value: &mut Option<f64>,
    range: RangeInclusive<f64>,
    label: &str,
) -> Option<f64> {
    let mut v = value.unwrap_or(*range.start());
    let response = ui.add(egui::Slider::new(&mut v, range).text(label));
    if response.changed() {
        *value = Some(v);
    }
    (response.drag_stopped() || (response.changed() && !response.dragged())).then_some(v)
}

fn action_data(key: &str, value: f64) -> HzValue {
    let mut data = HzValue::object();
    data.insert(key, value);
    data
}

fn thing_controls(
    ui: &mut egui::Ui,
    id: i64,
    model: &mut Model,
    name: &mut String,
    intents: &mut Vec<Intent>,
) {
    ui.horizontal(|ui| {
        ui.label(statics::EN_LABEL_NAME);
        ui.text_edit_singleline(name);
        if ui.button(statics::EN_BTN_SAVE).clicked() {
            intents.push(Intent::RenameThing {
                id,
                name: name.trim().to_string(),
            });
        }
    });
    ui.separator();

    let has = |feature: &str| model.thing().is_some_and(|t| t.has_feature(feature));
    let is_light = has(statics::FEATURE_LIGHT);
    let has_level = has(statics::FEATURE_LIGHT_LEVEL);
    let has_temperature = has(statics::FEATURE_LIGHT_TEMPERATURE);
    let has_color = has(statics::FEATURE_LIGHT_COLOR);
    let has_saturation = has(statics::FEATURE_LIGHT_SATURATION);

    if is_light {
        ui.horizontal(|ui| {
            for (label, action) in [
                (statics::EN_BTN_ON, statics::THING_ACTION_ON),
                (statics::EN_BTN_OFF, statics::THING_ACTION_OFF),
                (statics::EN_BTN_TOGGLE, statics::THING_ACTION_TOGGLE),
            ] {
                if ui.button(label).clicked() {
                    intents.push(Intent::ThingAction {
                        id,
                        action,
                        data: None,
                    });
                }
            }
        });
    }

    if let Some(light) = model.light_mut() {
        if has_level
            && let Some(level) =
                feature_slider(ui, &mut light.level, 0.0..=1.0, statics::EN_LABEL_LEVEL)
        {
            let level = level.max(statics::LEVEL_MIN_SENT);
            intents.push(Intent::ThingAction {
                id,
                action: statics::THING_ACTION_LEVEL,
                data: Some(action_data(statics::THING_ACTION_LEVEL, level)),
            });
        }
        if has_temperature
            && let Some(kelvin) = feature_slider(
                ui,
                &mut light.temperature,
                statics::TEMPERATURE_MIN_K..=statics::TEMPERATURE_MAX_K,
                statics::EN_LABEL_TEMP,
            )
        {
            intents.push(Intent::ThingAction {
                id,
                action: statics::THING_ACTION_TEMPERATURE,
                data: Some(action_data(statics::THING_ACTION_TEMPERATURE, kelvin)),
            });
        }
        if has_color
            && let Some(hue) =
                feature_slider(ui, &mut light.hue, 0.0..=1.0, statics::EN_LABEL_COLOUR)
        {
            intents.push(Intent::ThingAction {
                id,
                action: statics::THING_ACTION_HUE,
                data: Some(action_data(statics::THING_ACTION_HUE, hue)),
            });
        }
        if has_saturation
            && let Some(saturation) = feature_slider(
                ui,
                &mut light.saturation,
                0.0..=1.0,
                statics::EN_LABEL_SATURATION,
            )
        {
            intents.push(Intent::ThingAction {
                id,
                action: statics::THING_ACTION_SATURATION,
                data: Some(action_data(statics::THING_ACTION_SATURATION, saturation)),
            });
        }
    }

    match model {
        Model::Switch(switch) => {
            for (index, button) in switch.buttons().iter().enumerate() {
                ui.horizontal(|ui| {
                    let label = format!("{} {}", statics::EN_GLYPH_SWITCH, button.display_name());
                    if ui.button(label).clicked() {
                        intents.push(Intent::InvokeButton {
                            thing: id,
                            button: index,
                        });
                    }
                    if ui.small_button(statics::EN_BTN_RENAME).clicked() {
                        intents.push(Intent::StartRename(RenameTarget::Button {
                            thing: id,
                            button: index,
                        }));
                    }
                    if ui.small_button(statics::EN_BTN_EDIT_CODE).clicked() {
                        intents.push(Intent::EditCode(CodeTarget::Button {
                            thing: id,
                            button: index,
                        }));
                    }
                });
            }
        }
        Model::Clock(clock) => {
            egui::Grid::new(("clock", id)).num_columns(2).show(ui, |ui| {
                ui.label(statics::EN_LABEL_INTERVAL);
                ui.label(clock.interval.map(|i| i.to_string()).unwrap_or_default());
                ui.end_row();
                ui.label(statics::EN_LABEL_CODE);
                ui.monospace(clock.code.as_deref().unwrap_or_default());
                ui.end_row();
            });
            if ui.button(statics::EN_BTN_EDIT_CODE).clicked() {
                intents.push(Intent::EditCode(CodeTarget::Clock(id)));
            }
        }
        Model::Temperature(t) => {
            egui::Grid::new(("temperature", id))
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label(statics::EN_LABEL_TEMPERATURE);
                    if let Some(c) = t.temperature {
                        ui.label(format!("{c:.1} {}", statics::EN_UNIT_CELSIUS));
                    }
                    ui.end_row();
                    ui.label(statics::EN_LABEL_HUMIDITY);
                    if let Some(h) = t.humidity {
                        ui.label(format!("{h:.1} {}", statics::EN_UNIT_HUMIDITY));
                    }
                    ui.end_row();
                    ui.label(statics::EN_LABEL_LAST_UPDATED);
                    ui.label(t.format_last_updated());
                    ui.end_row();
                });
        }
        _ => {}
    }
}

fn endpoint_tree(
    ui: &mut egui::Ui,
    device: &ZigBeeDevice,
    ep: &ZigBeeEndpoint,
    spec: &ZigBeeSpec,
    intents: &mut Vec<Intent>,
) {
    egui::CollapsingHeader::new(ep.label())
        .id_salt(("endpoint", ep.endpoint))
        .show(ui, |ui| {
            egui::CollapsingHeader::new(statics::EN_NODE_CLUSTERS)
                .id_salt(("clusters", ep.endpoint))
                .show(ui, |ui| {
                    for cluster in spec.clusters_in(&ep.in_clusters) {
                        egui::CollapsingHeader::new(cluster.name.as_str())
                            .id_salt(("cluster", ep.endpoint, cluster.cluster))
                            .show(ui, |ui| {
                                for command in &cluster.rx_commands {
                                    if ui.button(command.name.as_str()).clicked() {
                                        intents.push(Intent::OpenCommand(CommandWindow::zcl(
                                            device, ep, cluster, command,
                                        )));
                                    }
                                }
                            });
                    }
                });
            egui::CollapsingHeader::new(statics::EN_NODE_BIND)
                .id_salt(("bind", ep.endpoint))
                .show(ui, |ui| {
                    for cluster in spec.clusters_in(&ep.out_clusters) {
                        if ui.button(cluster.name.as_str()).clicked() {
                            intents.push(Intent::OpenCommand(CommandWindow::bind(
                                device, ep, cluster,
                            )));
                        }
                    }
                });
        });
}

fn selectable_row_left(ui: &mut egui::Ui, selected: bool, text: &str, row_h: f32) -> egui::Response {
    let w = ui.available_width();
    let (rect, response) = ui.allocate_exact_size(egui::vec2(w, row_h), egui::Sense::click());
    let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);

    let visuals = ui.style().interact_selectable(&response, selected);
    if ui.is_rect_visible(rect) {
        ui.painter()
            .rect_filled(rect, visuals.corner_radius, visuals.bg_fill);
        ui.painter().rect_stroke(
            rect,
            visuals.corner_radius,
            visuals.bg_stroke,
            egui::StrokeKind::Inside,
        );

        let font_id = egui::TextStyle::Button.resolve(ui.style());
        let text_pos = rect.left_center() + egui::vec2(6.0, 0.0);
        ui.painter().text(
            text_pos,
            egui::Align2::LEFT_CENTER,
            text,
            font_id,
            visuals.text_color(),
        );
    }

    response
}

impl eframe::App for HazardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut intents = Vec::new();

        if ctx.input(|i| i.key_pressed(egui::Key::F5)) {
            intents.push(Intent::Refresh);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.tab, tab, tab.label());
                }
                ui.separator();
                if ui.button(statics::EN_BTN_REFRESH).clicked() {
                    intents.push(Intent::Refresh);
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(statics::EN_LABEL_SERVER);
                ui.monospace(self.server.as_str());
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(self.status.as_str());
                }
            });
        });

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Things => self.show_thing_list(ui, false, &mut intents),
            Tab::Groups => self.show_thing_list(ui, true, &mut intents),
            Tab::Map => self.show_map(ui, &mut intents),
            Tab::Actions => self.show_actions(ui, &mut intents),
            Tab::ZigBee => self.show_zigbee(ui, &mut intents),
        });

        self.show_thing_window(ctx, &mut intents);
        self.show_dialogs(ctx, &mut intents);

        if !intents.is_empty() {
            for intent in intents {
                self.apply(intent);
            }
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Gesture, parse_group, parse_interval, snap_location, thing_summary, zones};
    use crate::model::{Light, Location, Model, SwitchButton, Thing};

    fn thing(zone: Option<&str>, name: &str) -> Model {
        Model::Thing(Thing {
            zone: zone.map(str::to_string),
            name: Some(name.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn zones_keep_first_seen_order_without_repeats() {
        let things = [
            thing(Some("Hall"), "a"),
            thing(Some("Hall"), "b"),
            thing(None, "c"),
            thing(Some("Kitchen"), "d"),
        ];
        assert_eq!(zones(&things), ["Hall", "Kitchen"]);
    }

    #[test]
    fn drag_snaps_to_grid_and_stays_on_map() {
        let from = Location { x: 40.0, y: 60.0 };
        let to = snap_location(from, eframe::egui::vec2(27.0, -9.0));
        assert_eq!(to, Location { x: 60.0, y: 60.0 });

        let clamped = snap_location(from, eframe::egui::vec2(-100.0, -100.0));
        assert_eq!(clamped, Location { x: 0.0, y: 0.0 });
    }

    #[test]
    fn interval_and_group_text() {
        assert_eq!(parse_interval(" 30 ").unwrap(), Some(30));
        assert_eq!(parse_interval("").unwrap(), None);
        assert!(parse_interval("soon").is_err());
        assert_eq!(parse_group("").unwrap(), None);
        assert_eq!(parse_group("7").unwrap(), Some(7));
        assert!(parse_group("x").is_err());
    }

    #[test]
    fn light_summary_shows_level() {
        let mut light = Light {
            on: Some(true),
            level: Some(0.42),
            ..Default::default()
        };
        light.base.name = Some("Lamp".into());
        assert_eq!(thing_summary(&Model::Light(light.clone())), "Lamp  42%");
        light.on = Some(false);
        assert_eq!(thing_summary(&Model::Light(light)), "Lamp  Off");
    }

    #[test]
    fn gestures_map_to_button_fields() {
        let mut button = SwitchButton::default();
        *Gesture::Double.slot(&mut button) = Some("print('x')".into());
        assert_eq!(button.double.as_deref(), Some("print('x')"));
        assert_eq!(Gesture::Double.get(&button), "print('x')");
        assert_eq!(Gesture::Tap.get(&button), "");
    }
}
