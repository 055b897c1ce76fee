//! Hand-maintained ownership entries for engine methods whose class-typed values are not
//! reference-counted. Keys are `(class, method, argument name or "return value")`.
//!
//! The audit command reports entries that drift away from the current schema.

use crate::rules::ownership::Ownership::{
    self, IsTemporaryReference, LifetimeBoundToClass, MustAssertInstanceID, OwnershipTransferred,
    ReversesTheOwnership,
};

const R: &str = "return value";

pub(crate) const OWNERSHIP_TABLE: &[(&str, &str, &str, Ownership)] = &[
    // @GlobalScope utility functions
    ("@GlobalScope", "instance_from_id", R, MustAssertInstanceID),
    // Object
    // Node tree structure
    ("Node", "add_child", "node", OwnershipTransferred),
    ("Node", "add_sibling", "sibling", OwnershipTransferred),
    ("Node", "remove_child", "node", ReversesTheOwnership),
    ("Node", "reparent", "new_parent", IsTemporaryReference),
    ("Node", "move_child", "child_node", IsTemporaryReference),
    ("Node", "replace_by", "node", OwnershipTransferred),
    ("Node", "is_ancestor_of", "node", IsTemporaryReference),
    ("Node", "is_greater_than", "node", IsTemporaryReference),
    ("Node", "set_owner", "owner", IsTemporaryReference),
    ("Node", "get_owner", R, MustAssertInstanceID),
    ("Node", "get_child", R, MustAssertInstanceID),
    ("Node", "get_parent", R, MustAssertInstanceID),
    ("Node", "get_node", R, MustAssertInstanceID),
    ("Node", "get_node_or_null", R, MustAssertInstanceID),
    ("Node", "find_child", R, MustAssertInstanceID),
    ("Node", "find_parent", R, MustAssertInstanceID),
    ("Node", "get_tree", R, MustAssertInstanceID),
    ("Node", "get_viewport", R, MustAssertInstanceID),
    ("Node", "get_window", R, MustAssertInstanceID),
    ("Node", "get_last_exclusive_window", R, MustAssertInstanceID),
    ("Node", "duplicate", R, OwnershipTransferred),
    ("Node", "set_editable_instance", "node", IsTemporaryReference),
    ("Node", "is_editable_instance", "node", IsTemporaryReference),
    // Node3D / CanvasItem
    ("Node3D", "get_parent_node_3d", R, MustAssertInstanceID),
    ("CanvasItem", "get_canvas_layer_node", R, MustAssertInstanceID),
    // Control
    ("Control", "find_next_valid_focus", R, MustAssertInstanceID),
    ("Control", "find_prev_valid_focus", R, MustAssertInstanceID),
    ("Control", "find_valid_focus_neighbor", R, MustAssertInstanceID),
    ("Control", "_make_custom_tooltip", R, OwnershipTransferred),
    ("Control", "set_drag_preview", "control", OwnershipTransferred),
    ("Control", "grab_click_focus", "control", IsTemporaryReference),
    // SceneTree
    ("SceneTree", "get_root", R, LifetimeBoundToClass),
    ("SceneTree", "get_current_scene", R, MustAssertInstanceID),
    ("SceneTree", "set_current_scene", "child_node", IsTemporaryReference),
    ("SceneTree", "get_edited_scene_root", R, MustAssertInstanceID),
    ("SceneTree", "set_edited_scene_root", "scene", IsTemporaryReference),
    ("SceneTree", "get_first_node_in_group", R, MustAssertInstanceID),
    ("SceneTree", "queue_delete", "obj", OwnershipTransferred),
    // Viewport / Window
    ("Viewport", "get_camera_2d", R, MustAssertInstanceID),
    ("Viewport", "get_camera_3d", R, MustAssertInstanceID),
    ("Viewport", "gui_get_focus_owner", R, MustAssertInstanceID),
    ("Viewport", "gui_get_hovered_control", R, MustAssertInstanceID),
    ("Window", "popup_exclusive", "from_node", IsTemporaryReference),
    ("Window", "popup_exclusive_centered", "from_node", IsTemporaryReference),
    // Engine and other singletons
    ("Engine", "get_main_loop", R, MustAssertInstanceID),
    ("Engine", "get_singleton", R, MustAssertInstanceID),
    ("Engine", "register_singleton", "instance", OwnershipTransferred),
    ("EditorInterface", "get_base_control", R, LifetimeBoundToClass),
    ("EditorInterface", "get_editor_main_screen", R, LifetimeBoundToClass),
    ("EditorInterface", "get_edited_scene_root", R, MustAssertInstanceID),
    ("EditorInterface", "get_inspector", R, LifetimeBoundToClass),
    ("EditorInterface", "get_file_system_dock", R, LifetimeBoundToClass),
    ("EditorInterface", "get_resource_filesystem", R, LifetimeBoundToClass),
    ("EditorInterface", "get_selection", R, LifetimeBoundToClass),
    ("EditorInterface", "edit_node", "node", IsTemporaryReference),
    ("EditorInterface", "inspect_object", "object", IsTemporaryReference),
    ("EditorInterface", "popup_dialog", "dialog", IsTemporaryReference),
    ("EditorInterface", "popup_dialog_centered", "dialog", IsTemporaryReference),
    ("EditorPlugin", "add_control_to_container", "control", OwnershipTransferred),
    ("EditorPlugin", "add_control_to_bottom_panel", "control", OwnershipTransferred),
    ("EditorPlugin", "add_control_to_dock", "control", OwnershipTransferred),
    ("EditorPlugin", "remove_control_from_container", "control", ReversesTheOwnership),
    ("EditorPlugin", "remove_control_from_bottom_panel", "control", ReversesTheOwnership),
    ("EditorPlugin", "remove_control_from_docks", "control", ReversesTheOwnership),
    ("EditorPlugin", "get_editor_interface", R, LifetimeBoundToClass),
    ("EditorPlugin", "get_undo_redo", R, LifetimeBoundToClass),
    ("EditorPlugin", "_handles", "object", IsTemporaryReference),
    ("EditorPlugin", "_edit", "object", IsTemporaryReference),
    ("EditorPlugin", "_forward_3d_gui_input", "viewport_camera", IsTemporaryReference),
    ("EditorPlugin", "_forward_3d_draw_over_viewport", "viewport_control", IsTemporaryReference),
    ("EditorPlugin", "_forward_canvas_draw_over_viewport", "viewport_control", IsTemporaryReference),
    ("EditorInspectorPlugin", "_can_handle", "object", IsTemporaryReference),
    ("EditorInspectorPlugin", "_parse_begin", "object", IsTemporaryReference),
    ("EditorInspectorPlugin", "_parse_end", "object", IsTemporaryReference),
    ("EditorInspectorPlugin", "_parse_category", "object", IsTemporaryReference),
    ("EditorInspectorPlugin", "_parse_group", "object", IsTemporaryReference),
    ("EditorInspectorPlugin", "_parse_property", "object", IsTemporaryReference),
    ("EditorInspectorPlugin", "add_custom_control", "control", OwnershipTransferred),
    ("EditorInspectorPlugin", "add_property_editor", "editor", OwnershipTransferred),
    ("EditorInspectorPlugin", "add_property_editor_for_multiple_properties", "editor", OwnershipTransferred),
    ("EditorProperty", "get_edited_object", R, MustAssertInstanceID),
    ("EditorProperty", "add_focusable", "control", IsTemporaryReference),
    ("EditorProperty", "set_bottom_editor", "editor", IsTemporaryReference),
    ("EditorSelection", "add_node", "node", IsTemporaryReference),
    ("EditorSelection", "remove_node", "node", IsTemporaryReference),
    ("UndoRedo", "add_do_reference", "object", OwnershipTransferred),
    ("UndoRedo", "add_undo_reference", "object", OwnershipTransferred),
    // Physics
    ("PhysicsDirectSpaceState3D", "intersect_ray", "parameters", IsTemporaryReference),
    ("PhysicsDirectBodyState3D", "get_space_state", R, LifetimeBoundToClass),
    ("PhysicsDirectBodyState2D", "get_space_state", R, LifetimeBoundToClass),
    ("PhysicsDirectBodyState3D", "get_contact_collider_object", R, MustAssertInstanceID),
    ("PhysicsDirectBodyState2D", "get_contact_collider_object", R, MustAssertInstanceID),
    ("PhysicsServer3D", "body_get_direct_state", R, MustAssertInstanceID),
    ("PhysicsServer2D", "body_get_direct_state", R, MustAssertInstanceID),
    ("PhysicsServer3D", "space_get_direct_state", R, MustAssertInstanceID),
    ("PhysicsServer2D", "space_get_direct_state", R, MustAssertInstanceID),
    ("RayCast3D", "get_collider", R, MustAssertInstanceID),
    ("RayCast2D", "get_collider", R, MustAssertInstanceID),
    ("ShapeCast3D", "get_collider", R, MustAssertInstanceID),
    ("ShapeCast2D", "get_collider", R, MustAssertInstanceID),
    ("KinematicCollision3D", "get_collider", R, MustAssertInstanceID),
    ("KinematicCollision2D", "get_collider", R, MustAssertInstanceID),
    ("KinematicCollision3D", "get_local_shape", R, MustAssertInstanceID),
    ("KinematicCollision2D", "get_local_shape", R, MustAssertInstanceID),
    ("KinematicCollision3D", "get_collider_shape", R, MustAssertInstanceID),
    ("KinematicCollision2D", "get_collider_shape", R, MustAssertInstanceID),
    ("CollisionObject3D", "shape_owner_get_owner", R, MustAssertInstanceID),
    ("CollisionObject2D", "shape_owner_get_owner", R, MustAssertInstanceID),
    ("PhysicsBody3D", "add_collision_exception_with", "body", IsTemporaryReference),
    ("PhysicsBody2D", "add_collision_exception_with", "body", IsTemporaryReference),
    ("PhysicsBody3D", "remove_collision_exception_with", "body", IsTemporaryReference),
    ("PhysicsBody2D", "remove_collision_exception_with", "body", IsTemporaryReference),
    ("Area3D", "overlaps_body", "body", IsTemporaryReference),
    ("Area2D", "overlaps_body", "body", IsTemporaryReference),
    ("Area3D", "overlaps_area", "area", IsTemporaryReference),
    ("Area2D", "overlaps_area", "area", IsTemporaryReference),
    // Tweens and animation
    ("Tween", "tween_property", "object", IsTemporaryReference),
    ("Tween", "bind_node", "node", IsTemporaryReference),
    ("SkeletonIK3D", "get_parent_skeleton", R, MustAssertInstanceID),
    // Multiplayer and servers
    ("MultiplayerAPI", "object_configuration_add", "object", IsTemporaryReference),
    ("MultiplayerAPI", "object_configuration_remove", "object", IsTemporaryReference),
    ("MultiplayerSpawner", "spawn", R, OwnershipTransferred),
    ("XRServer", "get_primary_interface", R, MustAssertInstanceID),
    ("TextServerManager", "get_primary_interface", R, MustAssertInstanceID),
    // GUI containers and widgets
    ("PopupMenu", "add_submenu_node_item", "submenu", OwnershipTransferred),
    ("PopupMenu", "get_item_submenu_node", R, MustAssertInstanceID),
    ("MenuButton", "get_popup", R, LifetimeBoundToClass),
    ("OptionButton", "get_popup", R, LifetimeBoundToClass),
    ("LineEdit", "get_menu", R, LifetimeBoundToClass),
    ("TextEdit", "get_menu", R, LifetimeBoundToClass),
    ("TextEdit", "get_h_scroll_bar", R, LifetimeBoundToClass),
    ("TextEdit", "get_v_scroll_bar", R, LifetimeBoundToClass),
    ("RichTextLabel", "get_v_scroll_bar", R, LifetimeBoundToClass),
    ("RichTextLabel", "get_menu", R, LifetimeBoundToClass),
    ("ScrollContainer", "get_h_scroll_bar", R, LifetimeBoundToClass),
    ("ScrollContainer", "get_v_scroll_bar", R, LifetimeBoundToClass),
    ("ScrollContainer", "ensure_control_visible", "control", IsTemporaryReference),
    ("ItemList", "get_v_scroll_bar", R, LifetimeBoundToClass),
    ("Tree", "create_item", R, LifetimeBoundToClass),
    ("Tree", "get_root", R, LifetimeBoundToClass),
    ("Tree", "get_selected", R, LifetimeBoundToClass),
    ("Tree", "get_edited", R, LifetimeBoundToClass),
    ("Tree", "get_item_at_position", R, LifetimeBoundToClass),
    ("Tree", "get_next_selected", R, LifetimeBoundToClass),
    ("Tree", "get_next_selected", "from", IsTemporaryReference),
    ("Tree", "create_item", "parent", IsTemporaryReference),
    ("Tree", "scroll_to_item", "item", IsTemporaryReference),
    ("Tree", "set_selected", "item", IsTemporaryReference),
    ("Tree", "edit_selected", R, LifetimeBoundToClass),
    ("TreeItem", "get_tree", R, MustAssertInstanceID),
    ("TreeItem", "get_parent", R, LifetimeBoundToClass),
    ("TreeItem", "get_first_child", R, LifetimeBoundToClass),
    ("TreeItem", "get_child", R, LifetimeBoundToClass),
    ("TreeItem", "get_next", R, LifetimeBoundToClass),
    ("TreeItem", "get_prev", R, LifetimeBoundToClass),
    ("TreeItem", "get_next_visible", R, LifetimeBoundToClass),
    ("TreeItem", "get_prev_visible", R, LifetimeBoundToClass),
    ("TreeItem", "create_child", R, LifetimeBoundToClass),
    ("TreeItem", "add_child", "child", OwnershipTransferred),
    ("TreeItem", "remove_child", "child", ReversesTheOwnership),
    ("TreeItem", "move_before", "item", IsTemporaryReference),
    ("TreeItem", "move_after", "item", IsTemporaryReference),
    ("GraphEdit", "get_menu_hbox", R, LifetimeBoundToClass),
    ("ColorPicker", "get_picker", R, LifetimeBoundToClass),
    ("ColorPickerButton", "get_picker", R, LifetimeBoundToClass),
    ("ColorPickerButton", "get_popup", R, LifetimeBoundToClass),
    ("FileDialog", "get_vbox", R, LifetimeBoundToClass),
    ("FileDialog", "get_line_edit", R, LifetimeBoundToClass),
    ("AcceptDialog", "get_ok_button", R, LifetimeBoundToClass),
    ("AcceptDialog", "get_label", R, LifetimeBoundToClass),
    ("AcceptDialog", "add_button", R, LifetimeBoundToClass),
    ("AcceptDialog", "add_cancel_button", R, LifetimeBoundToClass),
    ("AcceptDialog", "remove_button", "button", ReversesTheOwnership),
    ("AcceptDialog", "register_text_enter", "line_edit", IsTemporaryReference),
    ("ConfirmationDialog", "get_cancel_button", R, LifetimeBoundToClass),
    ("SpinBox", "get_line_edit", R, LifetimeBoundToClass),
    ("ButtonGroup", "get_pressed_button", R, MustAssertInstanceID),
    ("BaseButton", "get_button_group", R, MustAssertInstanceID),
    ("SubViewportContainer", "_propagate_input_event", "event", IsTemporaryReference),
    ("TabContainer", "get_current_tab_control", R, MustAssertInstanceID),
    ("TabContainer", "get_tab_control", R, MustAssertInstanceID),
    ("TabContainer", "get_tab_bar", R, LifetimeBoundToClass),
    ("TabContainer", "get_popup", R, MustAssertInstanceID),
    ("TabContainer", "set_popup", "popup", IsTemporaryReference),
    ("TabContainer", "get_tab_idx_from_control", "control", IsTemporaryReference),
    // 3D helpers
    ("InstancePlaceholder", "create_instance", R, OwnershipTransferred),
    ("PackedScene", "instantiate", R, OwnershipTransferred),
    ("PackedScene", "pack", "path", IsTemporaryReference),
    ("Script", "instance_has", "base_object", IsTemporaryReference),
];
