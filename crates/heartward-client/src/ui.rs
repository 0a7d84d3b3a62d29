//! UI for the Heartward client.
//!
//! The lobby stands in for the host page: a single prompt that sends
//! [`LaunchVignette`]. During a visit one UI root carries the panel, the
//! transient message, the exit prompt buttons and the touch joystick.

use bevy::prelude::*;
use heartward_logic::ui::Panel;

use crate::input::{JOYSTICK_MARGIN, JOYSTICK_RADIUS};
use crate::state::{
    ActiveVignette, ClientOptions, JoystickBase, JoystickKnob, JoystickState, LaunchVignette,
    LobbyCamera, LobbyText, LobbyUi, MessageText, PanelText, PromptButton, PromptChoice,
    PromptRow, TouchCapability, VignetteDisabled, VignetteOwned,
};

const LOBBY_TEXT: &str = "Press Enter or tap to visit the ward";
const CLOSED_TEXT: &str = "The ward is closed today";
const KNOB_SIZE: f32 = 44.0;

const BUTTON_IDLE: Color = Color::srgb(0.2, 0.2, 0.3);
const BUTTON_HOVER: Color = Color::srgb(0.3, 0.3, 0.45);

// ============================================================================
// LOBBY
// ============================================================================

pub fn setup_lobby(mut commands: Commands) {
    let camera = commands.spawn((Camera2d, LobbyCamera)).id();
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            TargetCamera(camera),
            LobbyUi,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(LOBBY_TEXT),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.85, 0.9)),
                LobbyText,
            ));
        });
}

/// Enter, a click or a tap in the lobby starts a visit.
#[allow(clippy::too_many_arguments)]
pub fn lobby_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    options: Res<ClientOptions>,
    capability: Res<TouchCapability>,
    active: Option<Res<ActiveVignette>>,
    disabled: Option<Res<VignetteDisabled>>,
    mut autostarted: Local<bool>,
    mut launch: EventWriter<LaunchVignette>,
) {
    let touched = touches.iter_just_pressed().next().is_some();
    if touched {
        capability.0.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if active.is_some() || disabled.is_some() {
        return;
    }

    let autostart = options.autostart && !*autostarted;
    *autostarted = true;
    if autostart
        || touched
        || keyboard.just_pressed(KeyCode::Enter)
        || mouse.just_pressed(MouseButton::Left)
    {
        launch.send(LaunchVignette);
    }
}

/// Lobby shows only between visits.
pub fn show_lobby(
    active: Option<Res<ActiveVignette>>,
    disabled: Option<Res<VignetteDisabled>>,
    mut lobby: Query<&mut Visibility, With<LobbyUi>>,
    mut text: Query<&mut Text, With<LobbyText>>,
) {
    let wanted = if active.is_some() {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    };
    for mut visibility in &mut lobby {
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
    if disabled.is_some() {
        for mut text in &mut text {
            if **text != CLOSED_TEXT {
                **text = CLOSED_TEXT.to_string();
            }
        }
    }
}

// ============================================================================
// VISIT UI
// ============================================================================

fn prompt_button(parent: &mut ChildBuilder, label: &str, choice: PromptChoice) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(18.0), Val::Px(10.0)),
                margin: UiRect::horizontal(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            BorderRadius::all(Val::Px(6.0)),
            PromptButton(choice),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Spawns the visit's UI root, drawn by `camera`.
pub fn spawn_vignette_ui(commands: &mut Commands, camera: Entity) -> Entity {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::top(Val::Px(16.0)),
                row_gap: Val::Px(12.0),
                ..default()
            },
            TargetCamera(camera),
            VignetteOwned,
        ))
        .with_children(|root| {
            // Panel (top-center)
            root.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                TextLayout::new_with_justify(JustifyText::Center),
                PanelText,
            ));

            // Exit prompt choices, hidden until asked
            root.spawn((
                Node {
                    flex_direction: FlexDirection::Row,
                    display: Display::None,
                    ..default()
                },
                PromptRow,
            ))
            .with_children(|row| {
                prompt_button(row, "Keep exploring", PromptChoice::Continue);
                prompt_button(row, "Leave", PromptChoice::Leave);
            });

            // Transient message
            root.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.9, 0.3)),
                TextLayout::new_with_justify(JustifyText::Center),
                MessageText,
            ));

            // Joystick (bottom-left)
            root.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(JOYSTICK_MARGIN - JOYSTICK_RADIUS),
                    bottom: Val::Px(JOYSTICK_MARGIN - JOYSTICK_RADIUS),
                    width: Val::Px(JOYSTICK_RADIUS * 2.0),
                    height: Val::Px(JOYSTICK_RADIUS * 2.0),
                    display: Display::None,
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
                BorderRadius::MAX,
                JoystickBase,
            ))
            .with_children(|base| {
                base.spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(JOYSTICK_RADIUS - KNOB_SIZE / 2.0),
                        top: Val::Px(JOYSTICK_RADIUS - KNOB_SIZE / 2.0),
                        width: Val::Px(KNOB_SIZE),
                        height: Val::Px(KNOB_SIZE),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
                    BorderRadius::MAX,
                    JoystickKnob,
                ));
            });
        })
        .id()
}

fn show(node: &mut Node, visible: bool) {
    let display = if visible { Display::Flex } else { Display::None };
    if node.display != display {
        node.display = display;
    }
}

type PanelTextQuery<'w, 's> = Query<'w, 's, &'static mut Text, (With<PanelText>, Without<MessageText>)>;
type MessageTextQuery<'w, 's> =
    Query<'w, 's, &'static mut Text, (With<MessageText>, Without<PanelText>)>;
type PromptRowQuery<'w, 's> =
    Query<'w, 's, &'static mut Node, (With<PromptRow>, Without<JoystickBase>, Without<JoystickKnob>)>;
type JoystickBaseQuery<'w, 's> =
    Query<'w, 's, &'static mut Node, (With<JoystickBase>, Without<PromptRow>, Without<JoystickKnob>)>;
type JoystickKnobQuery<'w, 's> =
    Query<'w, 's, &'static mut Node, (With<JoystickKnob>, Without<PromptRow>, Without<JoystickBase>)>;

pub fn render_panel(
    vignette: Res<ActiveVignette>,
    joystick: Res<JoystickState>,
    mut panel_query: PanelTextQuery,
    mut message_query: MessageTextQuery,
    mut prompt_query: PromptRowQuery,
    mut base_query: JoystickBaseQuery,
    mut knob_query: JoystickKnobQuery,
) {
    let ui = vignette.scene.ui();

    if let Ok(mut text) = panel_query.get_single_mut() {
        let wanted = ui.panel.text();
        if **text != wanted {
            **text = wanted;
        }
    }
    if let Ok(mut text) = message_query.get_single_mut() {
        let wanted = ui.message.as_ref().map_or("", |m| m.text);
        if **text != wanted {
            **text = wanted.to_string();
        }
    }
    if let Ok(mut node) = prompt_query.get_single_mut() {
        show(&mut node, ui.panel == Panel::ExitPrompt);
    }
    if let Ok(mut node) = base_query.get_single_mut() {
        show(&mut node, ui.panel.shows_joystick());
    }
    if let Ok(mut node) = knob_query.get_single_mut() {
        let rest = JOYSTICK_RADIUS - KNOB_SIZE / 2.0;
        let left = Val::Px(rest + joystick.deflection.x * JOYSTICK_RADIUS);
        let top = Val::Px(rest + joystick.deflection.y * JOYSTICK_RADIUS);
        if node.left != left || node.top != top {
            node.left = left;
            node.top = top;
        }
    }
}

pub fn prompt_buttons(
    mut interactions: Query<(&Interaction, &PromptButton, &mut BackgroundColor), Changed<Interaction>>,
    mut vignette: ResMut<ActiveVignette>,
) {
    for (interaction, button, mut background) in &mut interactions {
        match interaction {
            Interaction::Pressed => match button.0 {
                PromptChoice::Continue => vignette.scene.choose_continue(),
                PromptChoice::Leave => vignette.scene.choose_leave(),
            },
            Interaction::Hovered => background.0 = BUTTON_HOVER,
            Interaction::None => background.0 = BUTTON_IDLE,
        }
    }
}
