// Central place for UI strings, REST paths and wire field names.
// Keep these out of gui.rs/client.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "Hazard";

pub const EN_TAB_THINGS: &str = "Things";
pub const EN_TAB_GROUPS: &str = "Groups";
pub const EN_TAB_MAP: &str = "Map";
pub const EN_TAB_ACTIONS: &str = "Actions";
pub const EN_TAB_ZIGBEE: &str = "ZigBee";

pub const EN_BTN_REFRESH: &str = "Refresh";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_CLOSE: &str = "Close";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BTN_OK: &str = "OK";
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_SEND: &str = "Send";
pub const EN_BTN_CLEAR: &str = "Clear";
pub const EN_BTN_DELETE: &str = "Delete";
pub const EN_BTN_RENAME: &str = "Rename";
pub const EN_BTN_EDIT_CODE: &str = "Edit code";
pub const EN_BTN_ADD_NEW: &str = "Add new...";
pub const EN_BTN_RECONFIGURE: &str = "Reconfigure";
pub const EN_BTN_ON: &str = "On";
pub const EN_BTN_OFF: &str = "Off";
pub const EN_BTN_TOGGLE: &str = "Toggle";
pub const EN_BTN_INVOKE: &str = "Invoke";
pub const EN_BTN_CREATE_THING: &str = "Create thing";
pub const EN_BTN_LOAD_ENDPOINTS: &str = "Load endpoints";

pub const EN_LABEL_LEVEL: &str = "Level";
pub const EN_LABEL_TEMP: &str = "Temp";
pub const EN_LABEL_COLOUR: &str = "Colour";
pub const EN_LABEL_SATURATION: &str = "Satn";
pub const EN_LABEL_TAP: &str = "Tap";
pub const EN_LABEL_SINGLE: &str = "Single";
pub const EN_LABEL_DOUBLE: &str = "Double";
pub const EN_LABEL_INTERVAL: &str = "Interval (s)";
pub const EN_LABEL_CODE: &str = "Code";
pub const EN_LABEL_TEMPERATURE: &str = "Temperature";
pub const EN_LABEL_HUMIDITY: &str = "Humidity";
pub const EN_LABEL_LAST_UPDATED: &str = "Last updated";
pub const EN_LABEL_ZONE: &str = "Zone:";
pub const EN_LABEL_EDIT: &str = "Edit";
pub const EN_LABEL_NAME: &str = "Name";
pub const EN_LABEL_THING_TYPE: &str = "Thing type:";
pub const EN_LABEL_REQUEST_JSON: &str = "Request JSON";
pub const EN_LABEL_RESPONSE_JSON: &str = "Response JSON";
pub const EN_LABEL_GROUP: &str = "Group (optional)";
pub const EN_LABEL_SERVER: &str = "Server:";
pub const EN_LABEL_BIND: &str = "Binds this cluster to the coordinator.";
pub const EN_LABEL_DELETE_PROMPT: &str = "Delete";

pub const EN_COL_NAME: &str = "Name";
pub const EN_COL_ADDR64: &str = "addr64";
pub const EN_COL_ADDR16: &str = "addr16";

pub const EN_NODE_ENDPOINTS: &str = "Endpoints";
pub const EN_NODE_CLUSTERS: &str = "Clusters";
pub const EN_NODE_BIND: &str = "Bind";
pub const EN_NODE_ZDO: &str = "ZDO";

pub const EN_WINDOW_ACTION_CODE: &str = "Action code";
pub const EN_WINDOW_BUTTON_CODE: &str = "Button code";
pub const EN_WINDOW_RENAME: &str = "Rename";
pub const EN_WINDOW_CONFIRM_DELETE: &str = "Confirm delete";
pub const EN_WINDOW_COMMAND: &str = "Command";

pub const EN_NO_THINGS: &str = "No things.";
pub const EN_NO_ZONES: &str = "No zones.";
pub const EN_NO_ACTIONS: &str = "No actions.";
pub const EN_NO_DEVICES: &str = "No devices.";
pub const EN_NO_ZONE: &str = "(no zone)";
pub const EN_NO_DEVICE_SELECTED: &str = "Select a device.";
pub const EN_NO_ENDPOINTS: &str = "No endpoints loaded.";
pub const EN_NO_SPEC: &str = "ZigBee spec not loaded.";
pub const EN_UNNAMED: &str = "(unknown)";
pub const EN_DRAG_HINT: &str = "Drag markers to move things; positions snap to the grid.";

pub const EN_UNIT_CELSIUS: &str = "\u{2103}";
pub const EN_UNIT_HUMIDITY: &str = "% rH";

// Small glyphs used as thing icons in lists.
pub const EN_GLYPH_GROUP: &str = "\u{25a3}";
pub const EN_GLYPH_LIGHT: &str = "\u{1f4a1}";
pub const EN_GLYPH_SWITCH: &str = "\u{23fb}";
pub const EN_GLYPH_CLOCK: &str = "\u{23f0}";
pub const EN_GLYPH_TEMPERATURE: &str = "\u{1f321}";
pub const EN_GLYPH_THING: &str = "\u{25cf}";

pub const EN_STATUS_LOADED: &str = "loaded";
pub const EN_STATUS_SAVED: &str = "saved";
pub const EN_STATUS_SENT: &str = "sent";
pub const EN_STATUS_CREATED: &str = "created";
pub const EN_STATUS_REMOVED: &str = "removed";

// Operation names, used as error context and in the status bar.
pub const EN_OP_CONNECT: &str = "connecting";
pub const EN_OP_LOAD_THINGS: &str = "loading things";
pub const EN_OP_LOAD_ACTIONS: &str = "loading actions";
pub const EN_OP_LOAD_DEVICES: &str = "loading ZigBee devices";
pub const EN_OP_LOAD_THING_TYPES: &str = "loading thing types";
pub const EN_OP_LOAD_SPEC: &str = "loading ZigBee spec";
pub const EN_OP_LOAD_ENDPOINTS: &str = "loading endpoints";
pub const EN_OP_SAVE_THING: &str = "saving thing";
pub const EN_OP_REMOVE_THING: &str = "removing thing";
pub const EN_OP_THING_ACTION: &str = "thing action";
pub const EN_OP_RECONFIGURE: &str = "reconfiguring";
pub const EN_OP_SAVE_ACTION: &str = "saving action";
pub const EN_OP_CREATE_ACTION: &str = "creating action";
pub const EN_OP_REMOVE_ACTION: &str = "removing action";
pub const EN_OP_INVOKE_ACTION: &str = "invoking action";
pub const EN_OP_RENAME_DEVICE: &str = "renaming device";
pub const EN_OP_CREATE_THING: &str = "creating thing";
pub const EN_OP_SEND_COMMAND: &str = "sending command";
pub const EN_OP_OPEN_COMMAND: &str = "preparing command";
pub const EN_OP_BIND: &str = "binding cluster";

pub const EN_ERR_NOT_CONNECTED: &str = "not connected to a server";
pub const EN_ERR_REQUEST_JSON: &str = "request JSON";
pub const EN_ERR_INTERVAL: &str = "interval must be a whole number of seconds";
pub const EN_ERR_GROUP: &str = "group must be a number";

// Backend REST API (API_ prefix). `{}` segments are filled by client.rs.
pub const API_RECONFIGURE: &str = "/api/rest/reconfigure";
pub const API_THING_LIST: &str = "/api/rest/thing/list";
pub const API_THING_TYPES: &str = "/api/rest/thing/types";
pub const API_THING: &str = "/api/rest/thing";
pub const API_ACTION_LIST: &str = "/api/rest/action/list";
pub const API_ACTION_CREATE: &str = "/api/rest/action/create";
pub const API_ACTION: &str = "/api/rest/action";
pub const API_ZIGBEE_DEVICE_LIST: &str = "/api/zigbee/device/list";
pub const API_ZIGBEE_DEVICE: &str = "/api/zigbee/device";
pub const API_ZIGBEE_GROUP: &str = "/api/zigbee/group";
pub const API_ZIGBEE_STATUS: &str = "/api/zigbee/status";
pub const API_ZIGBEE_SPEC: &str = "/api/zigbee/spec";

pub const API_SEG_ACTION: &str = "action";
pub const API_SEG_REMOVE: &str = "remove";
pub const API_SEG_INVOKE: &str = "invoke";
pub const API_SEG_ZDO: &str = "zdo";
pub const API_SEG_ZCL_CLUSTER: &str = "zcl/cluster";
pub const API_SEG_CREATE: &str = "create";

// Wire field names (FIELD_ prefix).
pub const FIELD_JSON_TYPE: &str = "json_type";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_ZONE: &str = "zone";
pub const FIELD_FEATURES: &str = "features";
pub const FIELD_LOCATION: &str = "location";
pub const FIELD_CODE: &str = "code";
pub const FIELD_ADDR16: &str = "addr16";
pub const FIELD_ADDR64: &str = "addr64";

// ZDO requests used by the explorer.
pub const ZDO_ACTIVE_EP: &str = "active_ep";
pub const ZDO_SIMPLE_DESC: &str = "simple_desc";
pub const ZDO_BIND: &str = "bind";
pub const ZDO_FIELD_ACTIVE_EPS: &str = "active_eps";
pub const ZDO_FIELD_SIMPLE_DESCRIPTORS: &str = "simple_descriptors";
// Bind destination: 64-bit device address, coordinator endpoint 1.
pub const ZDO_BIND_DST_ADDR_MODE_64: i64 = 3;
pub const ZDO_BIND_DST_EP: i64 = 1;

// Feature names reported by the backend for each thing.
pub const FEATURE_GROUP: &str = "group";
pub const FEATURE_LIGHT: &str = "light";
pub const FEATURE_LIGHT_LEVEL: &str = "light-level";
pub const FEATURE_LIGHT_TEMPERATURE: &str = "light-temperature";
pub const FEATURE_LIGHT_COLOR: &str = "light-color";
pub const FEATURE_LIGHT_SATURATION: &str = "light-saturation";
pub const FEATURE_SWITCH: &str = "switch";
pub const FEATURE_CLOCK: &str = "clock";
pub const FEATURE_TEMPERATURE: &str = "temperature";

// Thing actions posted to /api/rest/thing/{id}/action/{action}.
pub const THING_ACTION_ON: &str = "on";
pub const THING_ACTION_OFF: &str = "off";
pub const THING_ACTION_TOGGLE: &str = "toggle";
pub const THING_ACTION_LEVEL: &str = "level";
pub const THING_ACTION_TEMPERATURE: &str = "temperature";
pub const THING_ACTION_HUE: &str = "hue";
pub const THING_ACTION_SATURATION: &str = "saturation";
pub const THING_ACTION_INVOKE: &str = "invoke";

// Slider ranges.
pub const LEVEL_MIN_SENT: f64 = 0.05;
pub const TEMPERATURE_MIN_K: f64 = 1200.0;
pub const TEMPERATURE_MAX_K: f64 = 10000.0;

// Map view.
pub const MAP_GRID: f32 = 20.0;
pub const MAP_MARKER_SIZE: f32 = 40.0;

// Configuration defaults.
pub const DEFAULT_SERVER: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const ENV_SERVER: &str = "HAZARD_SERVER";
pub const ENV_LOG_DEFAULT: &str = "hazard=info";
