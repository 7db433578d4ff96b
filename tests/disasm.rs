use cvere_rs::decoder::Decoder;
use cvere_rs::disasm::{branch_target, fmt_register, render_listing};
use cvere_rs::isa::cvere::CvereDecoder;
use cvere_rs::{Columns, DisasmConfig, Disassembler, LabelEntry, Op};
use pretty_assertions::assert_eq;

fn asm_text(dis: &Disassembler, words: &[u16], start: u32) -> Vec<(String, String)> {
    dis.disassemble(words, start)
        .into_iter()
        .map(|r| (r.mnemonic, r.operands))
        .collect()
}

fn pair(m: &str, o: &str) -> (String, String) {
    (m.to_string(), o.to_string())
}

#[test]
fn addition_scenario_with_start_label() {
    let mut dis = Disassembler::new();
    dis.add_label(0x0000, "start");
    assert_eq!(
        asm_text(&dis, &[0xC105, 0xC203, 0x1312, 0xFFFF], 0),
        vec![
            pair("LOADI", "R1, 0x05"),
            pair("LOADI", "R2, 0x03"),
            pair("ADD", "R3, R1, R2"),
            pair("HALT", ""),
        ]
    );
}

#[test]
fn listing_with_all_columns() {
    let dis = Disassembler::new();
    let text = dis.disassemble_to_string(&[0xC105, 0x1312, 0x7611, 0xB300, 0x0000, 0xFFFF], 0);
    let expected = [
        "0000:  C105  LOADI  R1, 0x05  ; Rd=1, Imm=05",
        "0002:  1312  ADD    R3, R1, R2  ; Rd=3, Rs=1, Rt=2",
        "0004:  7611  NOT    R6, R1  ; Rd=6, Rs=1",
        "0006:  B300  STORE  R3, R0, 0x0  ; Rd=3, Rs=0, Off=0",
        "0008:  0000  NOP     ; No operation",
        "000A:  FFFF  HALT    ; Stop execution",
    ]
    .join("\n");
    assert_eq!(text, expected);
}

#[test]
fn listing_without_optional_columns() {
    let dis = Disassembler::new().with_config(DisasmConfig { columns: Columns::empty(), word_stride: false });
    assert_eq!(
        dis.disassemble_to_string(&[0xC105, 0xFFFF], 0x100),
        "0100:  LOADI  R1, 0x05\n0102:  HALT"
    );
}

#[test]
fn branch_targets_use_labels_when_known() {
    // the loop of the classic counter program
    let words = [0xC100, 0xC20A, 0x2101, 0x3321, 0xF3FD, 0xFFFF];
    let mut dis = Disassembler::new();
    dis.add_label(0x000A, "loop_start");
    dis.add_label(0x000E, "loop");
    let recs = dis.disassemble(&words, 0x000A);
    assert_eq!(recs[4].address, 0x0012);
    assert_eq!(recs[4].mnemonic, "BNE");
    assert_eq!(recs[4].operands, "R3, loop");
    assert_eq!(recs[4].annotation, "Rc=3, Target=0x000E");

    let bare = Disassembler::new().disassemble(&words, 0x000A);
    assert_eq!(bare[4].operands, "R3, 0x000E");
}

#[test]
fn jump_targets() {
    let mut dis = Disassembler::new();
    let recs = dis.disassemble(&[0xD234], 0);
    assert_eq!(recs[0].operands, "0x234");
    assert_eq!(recs[0].annotation, "Target=0x234");
    dis.add_label(0x234, "far");
    assert_eq!(dis.disassemble(&[0xD234], 0)[0].operands, "far");
    assert_eq!(dis.disassemble(&[0xD004], 0)[0].operands, "0x004");
}

#[test]
fn branch_offsets_sign_extend() {
    assert_eq!(branch_target(0x10, -1), 0x10);
    assert_eq!(branch_target(0x10, 0x7F), 0x10 + 2 + 254);
    assert_eq!(branch_target(0x100, -128), 0x100 + 2 - 256);
    let rec = &Disassembler::new().disassemble(&[0xE180], 0x100)[0];
    assert_eq!(rec.operands, "R1, 0x0002");
}

#[test]
fn backward_branch_below_zero_wraps_to_16_bits() {
    assert_eq!(branch_target(0, -128), 0xFF02);
    let rec = &Disassembler::new().disassemble(&[0xE180], 0)[0];
    assert_eq!(rec.operands, "R1, 0xFF02");
    assert_eq!(rec.annotation, "Rc=1, Target=0xFF02");
}

#[test]
fn bare_listing_of_halt() {
    let listing = render_listing(&Disassembler::new().disassemble(&[0xFFFF], 0), Columns::empty());
    assert_eq!(listing, "0000:  HALT");
}

#[test]
fn unknown_nibble_never_fails() {
    let recs = Disassembler::new().disassemble(&[0x0123, 0xC105], 0);
    assert_eq!(recs[0].mnemonic, "UNKNOWN_0");
    assert_eq!(recs[0].operands, "");
    assert_eq!(recs[0].annotation, "Unknown opcode: 0x0");
    assert_eq!(recs[1].address, 2);
    assert_eq!(recs[1].mnemonic, "LOADI");
}

#[test]
fn extended_word_pairs_by_default() {
    let mut dis = Disassembler::new();
    dis.add_label(0, "top");
    let recs = dis.disassemble(&[0xFA00, 0x0000, 0xE1FD, 0xFFFF], 0);
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].mnemonic, "CALL");
    assert_eq!(recs[0].reserved, Some(0x0000));
    assert_eq!(recs[0].annotation, "Extended instruction");
    assert_eq!(recs[1].address, 4);
    assert_eq!(recs[1].operands, "R1, top");
    assert_eq!(recs[2].address, 6);
    assert_eq!(recs[0].render(Columns::RAW), "0000:  FA00 0000  CALL");
}

#[test]
fn word_stride_keeps_one_record_per_word() {
    let dis = Disassembler::new().with_config(DisasmConfig { columns: Columns::all(), word_stride: true });
    let recs = dis.disassemble(&[0xFA00, 0x0000, 0xFFFF], 0);
    let names: Vec<&str> = recs.iter().map(|r| r.mnemonic.as_str()).collect();
    assert_eq!(names, vec!["CALL", "NOP", "HALT"]);
    assert_eq!(recs[2].address, 4);
    assert!(recs.iter().all(|r| r.reserved.is_none()));
}

#[test]
fn trailing_extended_word_stands_alone() {
    let recs = Disassembler::new().disassemble(&[0xFFFF, 0xFB00], 0);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[1].mnemonic, "RET");
    assert_eq!(recs[1].reserved, None);
}

#[test]
fn shared_nibble_falls_through_to_branch() {
    let d = CvereDecoder::new().decode(0xFE02).unwrap();
    assert_eq!(d.op(), Op::Bne);
    let rec = &Disassembler::new().disassemble(&[0xFC00, 0x0000, 0xF102], 0)[1];
    assert_eq!(rec.mnemonic, "BNE");
    assert_eq!(rec.operands, "R1, 0x000A");
}

#[test]
fn byte_stream_input() {
    let recs = Disassembler::new().disassemble_bytes(&[0x05, 0xC1, 0xFF, 0xFF, 0xAA], 0);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].raw, 0xC105);
    assert_eq!(recs[1].mnemonic, "HALT");
}

#[test]
fn register_names() {
    assert_eq!(fmt_register(0), "R0");
    assert_eq!(fmt_register(12), "RC");
    assert_eq!(fmt_register(16), "PC");
    assert_eq!(fmt_register(19), "SR");
    assert_eq!(fmt_register(20), "R?20");
}

#[test]
fn imported_labels_replace_by_address() {
    let mut dis = Disassembler::new();
    dis.add_label(2, "old");
    dis.extend_labels(vec![LabelEntry { addr: 2, name: "new".into() }]);
    assert_eq!(dis.labels().get(&2).map(String::as_str), Some("new"));
}

#[test]
fn records_serialize_to_json() {
    let recs = Disassembler::new().disassemble(&[0xC105], 0);
    let json = serde_json::to_value(&recs).unwrap();
    assert_eq!(json[0]["mnemonic"], "LOADI");
    assert_eq!(json[0]["raw"], 0xC105_u64);
    assert!(json[0].get("reserved").is_none());
}
