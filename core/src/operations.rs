use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, FONT_START, STACK_DEPTH};
use crate::error::Fault;
use crate::state::State;

/// Moves past the current instruction, or past the next one too if `condition` holds
fn skip_if(condition: bool, state: &State) -> State {
    let pc = if condition {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    State { pc, ..*state }
}

fn is_pressed(state: &State, key: u8) -> bool {
    // Registers can hold values past 0xF, which name no key
    state.keypad.get(key as usize).copied().unwrap_or(false)
}

/// clear
pub fn clear(state: &State) -> Result<State, Fault> {
    Ok(State {
        pc: state.pc + 0x2,
        frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    })
}

/// PC = STACK.pop() + 2
pub fn ret(state: &State) -> Result<State, Fault> {
    if state.sp == 0 {
        return Err(Fault::StackUnderflow { pc: state.pc });
    }
    let sp = state.sp - 0x1;
    Ok(State {
        pc: state.stack[sp as usize] + 0x2,
        sp,
        ..*state
    })
}

/// PC = NNN
pub fn jump(nnn: u16, state: &State) -> Result<State, Fault> {
    Ok(State { pc: nnn, ..*state })
}

/// STACK.push(PC); PC = NNN
pub fn call(nnn: u16, state: &State) -> Result<State, Fault> {
    if state.sp as usize >= STACK_DEPTH {
        return Err(Fault::StackOverflow { pc: state.pc });
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.pc;
    Ok(State {
        pc: nnn,
        sp: state.sp + 0x1,
        stack,
        ..*state
    })
}

/// if Vx == NN then skip
pub fn skip_eq_n(x: u8, nn: u8, state: &State) -> Result<State, Fault> {
    Ok(skip_if(state.v[x as usize] == nn, state))
}

/// if Vx != NN then skip
pub fn skip_ne_n(x: u8, nn: u8, state: &State) -> Result<State, Fault> {
    Ok(skip_if(state.v[x as usize] != nn, state))
}

/// if Vx == Vy then skip
pub fn skip_eq_v(x: u8, y: u8, state: &State) -> Result<State, Fault> {
    Ok(skip_if(state.v[x as usize] == state.v[y as usize], state))
}

/// Vx = NN
pub fn load_n(x: u8, nn: u8, state: &State) -> Result<State, Fault> {
    let mut v = state.v;
    v[x as usize] = nn;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Vx += NN
/// VF is untouched; the carry is dropped
pub fn add_n(x: u8, nn: u8, state: &State) -> Result<State, Fault> {
    let mut v = state.v;
    v[x as usize] = v[x as usize].wrapping_add(nn);
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Vx = Vy
pub fn mov(x: u8, y: u8, state: &State) -> Result<State, Fault> {
    let mut v = state.v;
    v[x as usize] = v[y as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Vx |= Vy
pub fn or(x: u8, y: u8, state: &State) -> Result<State, Fault> {
    let mut v = state.v;
    v[x as usize] |= v[y as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Vx &= Vy
pub fn and(x: u8, y: u8, state: &State) -> Result<State, Fault> {
    let mut v = state.v;
    v[x as usize] &= v[y as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Vx ^= Vy
pub fn xor(x: u8, y: u8, state: &State) -> Result<State, Fault> {
    let mut v = state.v;
    v[x as usize] ^= v[y as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// VF = carry; Vx += Vy
pub fn add_c(x: u8, y: u8, state: &State) -> Result<State, Fault> {
    let (res, carry) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    let mut v = state.v;
    v[0xF] = carry as u8;
    v[x as usize] = res;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// VF = !borrow; Vx -= Vy
pub fn sub_b(x: u8, y: u8, state: &State) -> Result<State, Fault> {
    let (res, borrow) = state.v[x as usize].overflowing_sub(state.v[y as usize]);
    let mut v = state.v;
    v[0xF] = !borrow as u8;
    v[x as usize] = res;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// VF = lsb(Vx); Vx >>= 1
pub fn shr(x: u8, state: &State) -> Result<State, Fault> {
    let vx = state.v[x as usize];
    let mut v = state.v;
    v[0xF] = vx & 0x1;
    v[x as usize] = vx >> 1;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// VF = !borrow; Vx = Vy - Vx
pub fn sub_b_rev(x: u8, y: u8, state: &State) -> Result<State, Fault> {
    let (res, borrow) = state.v[y as usize].overflowing_sub(state.v[x as usize]);
    let mut v = state.v;
    v[0xF] = !borrow as u8;
    v[x as usize] = res;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// VF = msb(Vx); Vx <<= 1
pub fn shl(x: u8, state: &State) -> Result<State, Fault> {
    let vx = state.v[x as usize];
    let mut v = state.v;
    v[0xF] = (vx & 0x80 != 0) as u8;
    v[x as usize] = vx << 1;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// if Vx != Vy then skip
pub fn skip_ne_v(x: u8, y: u8, state: &State) -> Result<State, Fault> {
    Ok(skip_if(state.v[x as usize] != state.v[y as usize], state))
}

/// I = NNN
pub fn load_i(nnn: u16, state: &State) -> Result<State, Fault> {
    Ok(State {
        pc: state.pc + 0x2,
        i: nnn,
        ..*state
    })
}

/// PC = NNN + V0
pub fn jump_offset(nnn: u16, state: &State) -> Result<State, Fault> {
    Ok(State {
        pc: nnn + u16::from(state.v[0x0]),
        ..*state
    })
}

/// Vx = random_byte & NN
pub fn rnd(x: u8, nn: u8, random_byte: u8, state: &State) -> Result<State, Fault> {
    let mut v = state.v;
    v[x as usize] = random_byte & nn;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// draw_sprite(x=Vx y=Vy height=N)
/// XORs the sprite in memory I..I+N onto the FrameBuffer at (Vx, Vy).
/// Pixels that fall off an edge wrap around to the opposite one.
/// VF = 1 if any lit pixel was switched off
pub fn draw(x: u8, y: u8, n: u8, state: &State) -> Result<State, Fault> {
    let sprite = state.read(state.i, n as usize)?;
    let origin_x = state.v[x as usize] as usize;
    let origin_y = state.v[y as usize] as usize;

    let mut frame_buffer = state.frame_buffer;
    let mut collision = 0x0;
    for (row, byte) in sprite.iter().enumerate() {
        let py = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = (byte >> (7 - bit)) & 0x1;
            collision |= pixel & frame_buffer[py][px];
            frame_buffer[py][px] ^= pixel;
        }
    }

    let mut v = state.v;
    v[0xF] = collision;
    Ok(State {
        pc: state.pc + 0x2,
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// if key[Vx] is pressed then skip
pub fn skip_key_down(x: u8, state: &State) -> Result<State, Fault> {
    Ok(skip_if(is_pressed(state, state.v[x as usize]), state))
}

/// if key[Vx] is not pressed then skip
pub fn skip_key_up(x: u8, state: &State) -> Result<State, Fault> {
    Ok(skip_if(!is_pressed(state, state.v[x as usize]), state))
}

/// Vx = DT
pub fn read_delay(x: u8, state: &State) -> Result<State, Fault> {
    let mut v = state.v;
    v[x as usize] = state.timers.delay;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Vx = first pressed key, which is then released
/// Leaves the pc in place while nothing is pressed so that the same instruction runs again
pub fn wait_key(x: u8, state: &State) -> Result<State, Fault> {
    match state.keypad.iter().position(|&pressed| pressed) {
        Some(key) => {
            let mut v = state.v;
            let mut keypad = state.keypad;
            v[x as usize] = key as u8;
            keypad[key] = false;
            Ok(State {
                pc: state.pc + 0x2,
                v,
                keypad,
                ..*state
            })
        }
        None => Ok(*state),
    }
}

/// DT = Vx
pub fn write_delay(x: u8, state: &State) -> Result<State, Fault> {
    let mut timers = state.timers;
    timers.delay = state.v[x as usize];
    Ok(State {
        pc: state.pc + 0x2,
        timers,
        ..*state
    })
}

/// ST = Vx
pub fn write_sound(x: u8, state: &State) -> Result<State, Fault> {
    let mut timers = state.timers;
    timers.sound = state.v[x as usize];
    Ok(State {
        pc: state.pc + 0x2,
        timers,
        ..*state
    })
}

/// I += Vx
/// VF is untouched; a range check happens whenever I is next used
pub fn add_index(x: u8, state: &State) -> Result<State, Fault> {
    Ok(State {
        pc: state.pc + 0x2,
        i: state.i.wrapping_add(u16::from(state.v[x as usize])),
        ..*state
    })
}

/// I = &FONT[Vx]
/// Only the low nibble of Vx selects a glyph
pub fn load_font(x: u8, state: &State) -> Result<State, Fault> {
    let glyph = u16::from(state.v[x as usize] & 0xF);
    Ok(State {
        pc: state.pc + 0x2,
        i: FONT_START + glyph * FONT_GLYPH_SIZE,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
pub fn store_bcd(x: u8, state: &State) -> Result<State, Fault> {
    state.check_writable(state.i, 3)?;
    let vx = state.v[x as usize];
    let bcd = [vx / 100, vx / 10 % 10, vx % 10];
    let start = state.i as usize;
    let mut memory = state.memory;
    memory[start..start + 3].copy_from_slice(&bcd);
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// mem[I..=I+x] = V0..=Vx
pub fn store_regs(x: u8, state: &State) -> Result<State, Fault> {
    let count = x as usize + 1;
    state.check_writable(state.i, count)?;
    let start = state.i as usize;
    let mut memory = state.memory;
    memory[start..start + count].copy_from_slice(&state.v[..count]);
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// V0..=Vx = mem[I..=I+x]
pub fn load_regs(x: u8, state: &State) -> Result<State, Fault> {
    let count = x as usize + 1;
    let mut v = state.v;
    v[..count].copy_from_slice(state.read(state.i, count)?);
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}
