extern crate classfile_decompiler;

mod common;

use classfile_decompiler::attribute_info::{CodeAttribute, LocalVariableTableAttribute, LocalVariableTableItem};
use classfile_decompiler::code_attribute::decode;
use classfile_decompiler::code_attribute::opcodes::*;
use classfile_decompiler::constant_info::ConstantPool;
use classfile_decompiler::decompile::cfg::{compute_bounds, resolve_exception_regions};
use classfile_decompiler::decompile::cfg_types::{LabelKind, Loop, LoopKind};
use classfile_decompiler::decompile::loops::detect_loops;
use classfile_decompiler::decompile::method::method_header;
use classfile_decompiler::decompile::{decompile_code, DecompileError, DecompileOptions, MethodSignature};
use classfile_decompiler::field_info::{FieldAccessFlags, FieldInfo};
use classfile_decompiler::method_info::MethodAccessFlags;
use classfile_decompiler::{ClassAccessFlags, ClassFile, Decompiler};

use common::*;

fn sum_loop() -> Vec<u8> {
    vec![
        ICONST_0, ISTORE_1, ICONST_0, ISTORE_2, GOTO, 0, 10, ILOAD_1, ILOAD_2, IADD, ISTORE_1, IINC, 2, 1, ILOAD_2,
        ILOAD_0, IF_ICMPLT, 0xff, 0xf7, ILOAD_1, IRETURN,
    ]
}

fn root(result: Result<String, DecompileError>) -> DecompileError {
    match result {
        Ok(body) => panic!("expected an error, got {}", body),
        Err(e) => e,
    }
}

// ---- Bounds and labels ----

#[test]
fn test_bounds_and_labels() {
    let code = code(sum_loop());
    let instructions = decode(&code.code).unwrap();
    let regions = resolve_exception_regions(&code, &instructions, &ConstantPool::new()).unwrap();
    let bounds = compute_bounds(&instructions, &regions).unwrap();

    assert_eq!(vec![0, 5, 10, 13, 15], bounds.indices().collect::<Vec<_>>());
    assert_eq!(vec![0, 5, 10, 13], bounds.labels.keys().copied().collect::<Vec<_>>());
    assert_eq!("L3", bounds.label(10).unwrap().to_string());
    assert_eq!(Some(4), bounds.get(10).unwrap().branched_from());
    assert_eq!(Some(12), bounds.get(5).unwrap().branched_from());
    assert!(bounds.label(15).is_none());
}

#[test]
fn test_handler_label_and_type() {
    let code = code_with_handlers(vec![NOP, RETURN, POP, RETURN], vec![catch(0, 1, 2, 0)]);
    let instructions = decode(&code.code).unwrap();
    let regions = resolve_exception_regions(&code, &instructions, &ConstantPool::new()).unwrap();
    assert_eq!("Throwable", regions[0].exception_type);

    let bounds = compute_bounds(&instructions, &regions).unwrap();
    let label = bounds.label(2).unwrap();
    assert_eq!(LabelKind::Catch, label.kind);
    assert_eq!("CATCH_L3", label.to_string());
}

#[test]
fn test_unreachable_code() {
    let pool = ConstantPool::new();
    assert!(matches!(
        decompile_static(&pool, "()V", vec![RETURN, NOP, RETURN]),
        Err(DecompileError::UnreachableCode { index: 0 })
    ));
}

#[test]
fn test_handler_entered_by_fall_through() {
    let pool = ConstantPool::new();
    let code = code_with_handlers(vec![NOP, POP, RETURN], vec![catch(0, 1, 1, 0)]);
    let result = decompile_with(&pool, MethodAccessFlags::STATIC, "()V", &code, &plain_options());
    assert!(matches!(result, Err(DecompileError::InvalidHandlerEntry { handler: 1, .. })));
}

#[test]
fn test_handler_inside_its_range() {
    let pool = ConstantPool::new();
    let code = code_with_handlers(vec![NOP, NOP, RETURN], vec![catch(0, 2, 1, 0)]);
    let result = decompile_with(&pool, MethodAccessFlags::STATIC, "()V", &code, &plain_options());
    assert!(matches!(result, Err(DecompileError::InvalidExceptionTable { handler_pc: 1, .. })));
}

#[test]
fn test_branch_into_instruction_middle() {
    let pool = ConstantPool::new();
    let result = decompile_static(&pool, "()V", vec![GOTO, 0, 2, RETURN]);
    assert!(matches!(result, Err(DecompileError::BranchTargetNotFound { index: 0, target: 2 })));
}

// ---- Straight-line evaluation ----

#[test]
fn test_arithmetic_with_instruction_comments() {
    let pool = ConstantPool::new();
    let code = code(vec![ICONST_2, ICONST_3, IADD, IRETURN]);
    let body = decompile_with(&pool, MethodAccessFlags::STATIC, "()I", &code, &DecompileOptions::default()).unwrap();
    assert_eq!("{\n\t/*  3 */ return 2 + 3;\n}", body);
}

#[test]
fn test_new_object() {
    let mut pool = ConstantPool::new();
    let class = pool.add_class("demo/Widget");
    let init = pool.add_method_ref("demo/Widget", "<init>", "()V");
    let mut bytes = vec![NEW];
    bytes.extend(index(class));
    bytes.push(DUP);
    bytes.push(INVOKESPECIAL);
    bytes.extend(index(init));
    bytes.extend([ASTORE_1, RETURN]);

    let body = decompile_static(&pool, "()V", bytes).unwrap();
    assert_eq!(
        "{\n\tdemo.Widget obj0 = new demo.Widget();\n\tvar1 = obj0;\n\treturn;\n}",
        body
    );
}

#[test]
fn test_static_fields() {
    let mut pool = ConstantPool::new();
    let source = pool.add_field_ref("demo/A", "x", "I");
    let target = pool.add_field_ref("demo/B", "y", "I");
    let mut bytes = vec![GETSTATIC];
    bytes.extend(index(source));
    bytes.push(PUTSTATIC);
    bytes.extend(index(target));
    bytes.push(RETURN);

    let body = decompile_static(&pool, "()V", bytes).unwrap();
    assert_eq!("{\n\tdemo.B.y = (int) demo.A.x;\n\treturn;\n}", body);
}

#[test]
fn test_array_load_from_non_array() {
    let pool = ConstantPool::new();
    let result = decompile_static(&pool, "(I)V", vec![ILOAD_0, ICONST_0, AALOAD, POP, RETURN]);
    match root(result) {
        DecompileError::ExpectedArrayType { mnemonic, offset, found } => {
            assert_eq!("aaload", mnemonic);
            assert_eq!(2, offset);
            assert_eq!("int", found);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_array_initializer_is_named() {
    let pool = ConstantPool::new();
    let bytes = vec![ICONST_3, NEWARRAY, 10, DUP, ICONST_0, ICONST_5, IASTORE, ASTORE_0, RETURN];
    let body = decompile_static(&pool, "()V", bytes).unwrap();
    assert_eq!(
        "{\n\tint[] obj0 = new int[3];\n\tobj0[0] = 5;\n\tvar0 = obj0;\n\treturn;\n}",
        body
    );
}

#[test]
fn test_object_counter_spans_blocks() {
    let mut pool = ConstantPool::new();
    let class = pool.add_class("demo/Widget");
    let init = pool.add_method_ref("demo/Widget", "<init>", "()V");
    let mut bytes = Vec::new();
    for _ in 0..2 {
        bytes.push(NEW);
        bytes.extend(index(class));
        bytes.push(DUP);
        bytes.push(INVOKESPECIAL);
        bytes.extend(index(init));
        bytes.push(POP);
    }
    // goto +3 splits the two allocations into separate blocks.
    bytes.splice(8..8, [GOTO, 0, 3]);
    bytes.push(RETURN);

    let body = decompile_static(&pool, "()V", bytes).unwrap();
    assert!(body.contains("demo.Widget obj0 = new demo.Widget();"), "{}", body);
    assert!(body.contains("demo.Widget obj1 = new demo.Widget();"), "{}", body);
}

#[test]
fn test_getfield_and_putfield() {
    let mut pool = ConstantPool::new();
    let count = pool.add_field_ref(CLASS_NAME, "count", "I");
    let ready = pool.add_field_ref(CLASS_NAME, "ready", "Z");

    let mut get = vec![ALOAD_0, GETFIELD];
    get.extend(index(count));
    get.push(IRETURN);
    assert_eq!(
        "{\n\treturn (int) (this).count;\n}",
        decompile_instance(&pool, "()I", get).unwrap()
    );

    let mut put = vec![ALOAD_0, ICONST_1, PUTFIELD];
    put.extend(index(ready));
    put.push(RETURN);
    assert_eq!(
        "{\n\tthis.ready = true;\n\treturn;\n}",
        decompile_instance(&pool, "()V", put).unwrap()
    );
}

#[test]
fn test_virtual_call_on_argument() {
    let mut pool = ConstantPool::new();
    let length = pool.add_method_ref("java/lang/String", "length", "()I");
    let mut bytes = vec![ALOAD_0, INVOKEVIRTUAL];
    bytes.extend(index(length));
    bytes.push(IRETURN);
    let body = decompile_static(&pool, "(Ljava/lang/String;)I", bytes).unwrap();
    assert_eq!("{\n\treturn arg0.length();\n}", body);
}

#[test]
fn test_long_compare_uses_wide_slots() {
    let pool = ConstantPool::new();
    let body = decompile_static(&pool, "(JJ)I", vec![LLOAD_0, LLOAD_2, LCMP, IRETURN]).unwrap();
    assert_eq!("{\n\treturn Long.compare(arg0, arg2);\n}", body);
}

#[test]
fn test_class_literal() {
    let mut pool = ConstantPool::new();
    let string = pool.add_class("java/lang/String");
    let body = decompile_static(&pool, "()Ljava/lang/Class;", vec![LDC, string as u8, ARETURN]).unwrap();
    assert_eq!("{\n\treturn String.class;\n}", body);
}

#[test]
fn test_string_and_long_constants() {
    let mut pool = ConstantPool::new();
    let text = pool.add_string("a\"b");
    let big = pool.add_long(1 << 40);
    let mut bytes = vec![LDC, text as u8, POP, LDC2_W];
    bytes.extend(index(big));
    bytes.extend([LSTORE_0, RETURN]);
    let body = decompile_static(&pool, "()V", bytes).unwrap();
    assert_eq!("{\n\t\"a\\\"b\";\n\tvar0 = 1099511627776L;\n\treturn;\n}", body);
}

#[test]
fn test_multi_dimensional_arrays() {
    let mut pool = ConstantPool::new();
    let cube = pool.add_class("[[[I");
    let mut bytes = vec![ICONST_2, ICONST_3, MULTIANEWARRAY];
    bytes.extend(index(cube));
    bytes.extend([2, ARETURN]);
    let body = decompile_static(&pool, "()Ljava/lang/Object;", bytes).unwrap();
    assert_eq!("{\n\treturn new int[2][3][];\n}", body);

    let row = pool.add_class("[I");
    let mut bytes = vec![ICONST_4, ANEWARRAY];
    bytes.extend(index(row));
    bytes.push(ARETURN);
    let body = decompile_static(&pool, "()Ljava/lang/Object;", bytes).unwrap();
    assert_eq!("{\n\treturn new int[4][];\n}", body);
}

#[test]
fn test_throw_consumes_exception() {
    let mut pool = ConstantPool::new();
    let class = pool.add_class("java/lang/RuntimeException");
    let init = pool.add_method_ref("java/lang/RuntimeException", "<init>", "()V");
    let mut bytes = vec![NEW];
    bytes.extend(index(class));
    bytes.extend([DUP, INVOKESPECIAL]);
    bytes.extend(index(init));
    bytes.push(ATHROW);

    let body = decompile_static(&pool, "()V", bytes).unwrap();
    assert_eq!(
        "{\n\tRuntimeException obj0 = new RuntimeException();\n\tthrow obj0;\n}",
        body
    );
}

#[test]
fn test_lookupswitch_dump() {
    let pool = ConstantPool::new();
    let bytes = vec![
        ILOAD_0, LOOKUPSWITCH, 0, 0, 0, 0, 0, 20, 0, 0, 0, 1, 0, 0, 0, 5, 0, 0, 0, 30, RETURN,
    ];
    let body = decompile_static(&pool, "(I)V", bytes).unwrap();
    assert!(body.contains("\tlookupswitch(arg0):\n\t\tdefault: +20\n\t\t5: +30"), "{}", body);
}

#[test]
fn test_unsupported_instruction() {
    let pool = ConstantPool::new();
    let result = decompile_static(&pool, "(Ljava/lang/Object;)V", vec![ALOAD_0, MONITORENTER, RETURN]);
    assert!(matches!(
        result,
        Err(DecompileError::UnsupportedInstruction {
            mnemonic: "monitorenter",
            offset: 1
        })
    ));
}

// ---- Constructors ----

#[test]
fn test_empty_super_call_is_dropped() {
    let mut pool = ConstantPool::new();
    let init = pool.add_method_ref("java/lang/Object", "<init>", "()V");
    let mut bytes = vec![ALOAD_0, INVOKESPECIAL];
    bytes.extend(index(init));
    bytes.push(RETURN);
    assert_eq!("{\n\treturn;\n}", decompile_instance(&pool, "()V", bytes).unwrap());
}

#[test]
fn test_this_and_super_calls() {
    let mut pool = ConstantPool::new();
    let own = pool.add_method_ref(CLASS_NAME, "<init>", "(I)V");
    let parent = pool.add_method_ref("demo/Base", "<init>", "(I)V");

    let mut bytes = vec![ALOAD_0, ICONST_5, INVOKESPECIAL];
    bytes.extend(index(own));
    bytes.push(RETURN);
    assert_eq!(
        "{\n\tthis((int) 5);\n\treturn;\n}",
        decompile_instance(&pool, "()V", bytes).unwrap()
    );

    let mut bytes = vec![ALOAD_0, ILOAD_1, INVOKESPECIAL];
    bytes.extend(index(parent));
    bytes.push(RETURN);
    assert_eq!(
        "{\n\tsuper((int) arg1);\n\treturn;\n}",
        decompile_instance(&pool, "(I)V", bytes).unwrap()
    );
}

// ---- Booleans ----

#[test]
fn test_boolean_argument_condition() {
    let pool = ConstantPool::new();
    let bytes = vec![ILOAD_0, IFEQ, 0, 5, ICONST_1, IRETURN, ICONST_0, IRETURN];
    let body = decompile_static(&pool, "(Z)Z", bytes).unwrap();
    assert!(body.contains("if(!arg0) { break L3; }"), "{}", body);
}

#[test]
fn test_boolean_call_argument() {
    let mut pool = ConstantPool::new();
    let flag = pool.add_method_ref(CLASS_NAME, "flag", "(Z)V");
    let mut bytes = vec![ICONST_1, INVOKESTATIC];
    bytes.extend(index(flag));
    bytes.push(RETURN);
    assert_eq!(
        "{\n\tdemo.Sample.flag(true);\n\treturn;\n}",
        decompile_static(&pool, "()V", bytes.clone()).unwrap()
    );

    bytes[0] = ICONST_2;
    assert!(matches!(
        decompile_static(&pool, "()V", bytes),
        Err(DecompileError::InvalidBooleanConstant { value: 2 })
    ));
}

#[test]
fn test_boolean_ordering_is_rejected() {
    let pool = ConstantPool::new();
    let bytes = vec![ILOAD_0, IFLT, 0, 4, NOP, RETURN];
    assert!(matches!(
        decompile_static(&pool, "(Z)V", bytes),
        Err(DecompileError::UnsupportedUsage { mnemonic: "iflt", offset: 1, .. })
    ));
}

// ---- Stack recovery ----

#[test]
fn test_stack_underflow_recovery() {
    let pool = ConstantPool::new();
    assert_eq!(
        "{\n\tMISSING_STACK_OBJECT;\n\treturn;\n}",
        decompile_static(&pool, "()V", vec![POP, RETURN]).unwrap()
    );

    let strict = DecompileOptions {
        recover_stack_underflow: false,
        ..plain_options()
    };
    let result = decompile_with(&pool, MethodAccessFlags::STATIC, "()V", &code(vec![POP, RETURN]), &strict);
    assert!(matches!(result, Err(DecompileError::StackUnderflow { offset: 0 })));
}

#[test]
fn test_leftover_stack_value() {
    let pool = ConstantPool::new();
    let body = decompile_static(&pool, "()V", vec![ICONST_1, GOTO, 0, 3, RETURN]).unwrap();
    assert_eq!(
        "{\n\tL2: {\n\t\t// UNHANDLED STACK OBJECT: 1\n\t\tbreak L2;\n\t}\n\treturn;\n}",
        body
    );
}

#[test]
fn test_pending_value_flushed_before_return() {
    let mut pool = ConstantPool::new();
    let a = pool.add_method_ref(CLASS_NAME, "a", "()I");
    let mut bytes = vec![INVOKESTATIC];
    bytes.extend(index(a));
    bytes.extend([ICONST_1, IRETURN]);

    let body = decompile_static(&pool, "()I", bytes).unwrap();
    assert_eq!("{\n\tdemo.Sample.a();\n\treturn 1;\n}", body);
}

#[test]
fn test_pending_values_keep_their_own_lines() {
    let mut pool = ConstantPool::new();
    let a = pool.add_method_ref(CLASS_NAME, "a", "()I");
    let b = pool.add_method_ref(CLASS_NAME, "b", "()I");
    let mut bytes = vec![INVOKESTATIC];
    bytes.extend(index(a));
    bytes.push(INVOKESTATIC);
    bytes.extend(index(b));
    bytes.push(RETURN);

    let body = decompile_static(&pool, "()V", bytes).unwrap();
    assert_eq!("{\n\tdemo.Sample.a();\n\tdemo.Sample.b();\n\treturn;\n}", body);
}

#[test]
fn test_pending_values_share_origin_line() {
    let mut pool = ConstantPool::new();
    let a = pool.add_method_ref(CLASS_NAME, "a", "()I");
    let mut bytes = vec![INVOKESTATIC];
    bytes.extend(index(a));
    bytes.extend([DUP, DUP, IRETURN]);

    let body = decompile_static(&pool, "()I", bytes).unwrap();
    assert_eq!(
        "{\n\tdemo.Sample.a(); /* Same line */ demo.Sample.a();\n\treturn demo.Sample.a();\n}",
        body
    );
}

// ---- Loops ----

#[test]
fn test_detect_while_loop() {
    let instructions = decode(&sum_loop()).unwrap();
    let bounds = compute_bounds(&instructions, &[]).unwrap();
    let loops = detect_loops(&instructions, &bounds).unwrap();
    assert_eq!(
        vec![Loop {
            start: 5,
            condition_start: 10,
            end: 12,
            break_target: 13,
            kind: LoopKind::While,
        }],
        loops
    );
}

#[test]
fn test_while_loop_body() {
    let pool = ConstantPool::new();
    let body = decompile_static(&pool, "(I)I", sum_loop()).unwrap();
    assert_eq!(
        "{\n\tvar1 = 0;\n\tvar2 = 0;\n\tLOOP_L2: while(true) {\n\t\tL2: {\n\t\t\tif(var2 < arg0) { break L2; }\n\t\t\tbreak LOOP_L2;\n\t\t}\n\t\tvar1 = var1 + var2;\n\t\tvar2++;\n\t}\n\treturn var1;\n}",
        body
    );
}

#[test]
fn test_do_while_loop_body() {
    let pool = ConstantPool::new();
    let bytes = vec![ICONST_0, ISTORE_1, IINC, 1, 1, ILOAD_1, ILOAD_0, IF_ICMPLT, 0xff, 0xfb, ILOAD_1, IRETURN];
    let body = decompile_static(&pool, "(I)I", bytes).unwrap();
    assert_eq!(
        "{\n\tvar1 = 0;\n\tLOOP_L2: while(true) {\n\t\tvar1++;\n\t\tif(var1 < arg0) { continue LOOP_L2; }\n\t\tbreak LOOP_L2;\n\t}\n\treturn var1;\n}",
        body
    );
}

#[test]
fn test_infinite_loop_with_break() {
    let mut pool = ConstantPool::new();
    let work = pool.add_method_ref(CLASS_NAME, "work", "()V");
    let mut bytes = vec![ILOAD_0, IFNE, 0, 9, INVOKESTATIC];
    bytes.extend(index(work));
    bytes.extend([GOTO, 0xff, 0xf9, RETURN]);

    let body = decompile_static(&pool, "(I)V", bytes).unwrap();
    assert_eq!(
        "{\n\tL3: {\n\t\tLOOP_L1: while(true) {\n\t\t\tif(arg0 != 0) { break L3; }\n\t\t\tdemo.Sample.work();\n\t\t\tcontinue LOOP_L1;\n\t\t}\n\t}\n\treturn;\n}",
        body
    );
}

#[test]
fn test_duplicate_loop_start() {
    let pool = ConstantPool::new();
    let bytes = vec![GOTO, 0, 7, ILOAD_0, IFEQ, 0xff, 0xff, ILOAD_0, IFNE, 0xff, 0xfb, RETURN];
    assert!(matches!(
        decompile_static(&pool, "(I)V", bytes),
        Err(DecompileError::DuplicateLoopStart { start: 1, end: 2 })
    ));
}

#[test]
fn test_loop_without_exit() {
    let pool = ConstantPool::new();
    assert!(matches!(
        decompile_static(&pool, "()V", vec![NOP, GOTO, 0xff, 0xff]),
        Err(DecompileError::LoopBreakTargetNotFound { start: 0, end: 1 })
    ));
}

#[test]
fn test_branch_into_loop_condition() {
    let pool = ConstantPool::new();
    let bytes = vec![
        GOTO, 0, 8, ILOAD_0, IFEQ, 0, 5, NOP, ILOAD_0, ILOAD_0, IF_ICMPLT, 0xff, 0xf9, RETURN,
    ];
    assert!(matches!(
        decompile_static(&pool, "(I)V", bytes),
        Err(DecompileError::AmbiguousLoopCondition { index: 2, target: 5 })
    ));
}

// ---- Structuring ----

#[test]
fn test_forward_branch_becomes_labeled_block() {
    let pool = ConstantPool::new();
    let bytes = vec![ILOAD_0, ILOAD_1, IF_ICMPLE, 0, 5, ILOAD_0, IRETURN, ILOAD_1, IRETURN];
    let body = decompile_static(&pool, "(II)I", bytes).unwrap();
    assert_eq!(
        "{\n\tL3: {\n\t\tif(arg0 <= arg1) { break L3; }\n\t\treturn arg0;\n\t}\n\treturn arg1;\n}",
        body
    );
}

#[test]
fn test_exception_handler_block() {
    let mut pool = ConstantPool::new();
    let g = pool.add_method_ref(CLASS_NAME, "g", "()V");
    let h = pool.add_method_ref(CLASS_NAME, "h", "()V");
    let exception = pool.add_class("java/lang/Exception");
    let mut bytes = vec![INVOKESTATIC];
    bytes.extend(index(g));
    bytes.extend([GOTO, 0, 7, ASTORE_0, INVOKESTATIC]);
    bytes.extend(index(h));
    bytes.push(RETURN);

    let code = code_with_handlers(bytes, vec![catch(0, 3, 6, exception)]);
    let body = decompile_with(&pool, MethodAccessFlags::STATIC, "()V", &code, &plain_options()).unwrap();
    assert_eq!(
        "{\n\tdemo.Sample.g();\n\tL4: {\n\t\tbreak L4;\n\t\t// CATCH_L3: catch (Exception exception)\n\t\tvar0 = exception;\n\t\tdemo.Sample.h();\n\t}\n\treturn;\n}",
        body
    );
}

#[test]
fn test_custom_indent() {
    let pool = ConstantPool::new();
    let options = DecompileOptions {
        indent: "  ".to_string(),
        ..plain_options()
    };
    let bytes = vec![ILOAD_0, ILOAD_1, IF_ICMPLE, 0, 5, ILOAD_0, IRETURN, ILOAD_1, IRETURN];
    let body = decompile_with(&pool, MethodAccessFlags::STATIC, "(II)I", &code(bytes), &options).unwrap();
    assert!(body.contains("\n  L3: {\n    if(arg0 <= arg1)"), "{}", body);
}

// ---- Local variable names and headers ----

fn named_locals(pool: &mut ConstantPool) -> CodeAttribute {
    let lvt_name = pool.add_utf8("LocalVariableTable");
    let int = pool.add_utf8("I");
    let count = pool.add_utf8("count");
    let total = pool.add_utf8("total");
    let item = |start_pc, length, name_index, index| LocalVariableTableItem {
        start_pc,
        length,
        name_index,
        descriptor_index: int,
        index,
    };
    let lvt = LocalVariableTableAttribute::new(vec![item(0, 4, count, 0), item(2, 2, total, 1)]);
    CodeAttribute::new(
        1,
        2,
        vec![ILOAD_0, ISTORE_1, ILOAD_1, IRETURN],
        vec![],
        vec![lvt.to_attribute(lvt_name).unwrap()],
    )
}

#[test]
fn test_local_variable_table_names() {
    let mut pool = ConstantPool::new();
    let code = named_locals(&mut pool);
    let body = decompile_with(&pool, MethodAccessFlags::STATIC, "(I)I", &code, &plain_options()).unwrap();
    assert_eq!("{\n\ttotal = count;\n\treturn total;\n}", body);

    let options = DecompileOptions {
        use_local_variable_table: false,
        ..plain_options()
    };
    let body = decompile_with(&pool, MethodAccessFlags::STATIC, "(I)I", &code, &options).unwrap();
    assert_eq!("{\n\tvar1 = arg0;\n\treturn var1;\n}", body);
}

#[test]
fn test_method_headers() {
    let mut pool = ConstantPool::new();
    let code = named_locals(&mut pool);
    let table = code.local_variable_table(&pool).unwrap();
    let signature = |access_flags, name, descriptor| MethodSignature {
        class_name: CLASS_NAME,
        access_flags,
        name,
        descriptor,
    };

    let sum = signature(MethodAccessFlags::STATIC, "sum", "(I)I");
    assert_eq!("static int sum(int count)", method_header(&sum, table.as_ref(), &pool).unwrap());
    assert_eq!("static int sum(int arg0)", method_header(&sum, None, &pool).unwrap());

    let init = signature(MethodAccessFlags::PUBLIC, "<init>", "(J[Ljava/lang/String;)V");
    assert_eq!(
        "public Sample(long arg1, String[] arg3)",
        method_header(&init, None, &pool).unwrap()
    );

    let clinit = signature(MethodAccessFlags::STATIC, "<clinit>", "()V");
    assert_eq!("static", method_header(&clinit, None, &pool).unwrap());

    let bad = signature(MethodAccessFlags::STATIC, "bad", "(I");
    assert!(matches!(
        method_header(&bad, None, &pool),
        Err(DecompileError::MalformedDescriptor { .. })
    ));
}

#[test]
fn test_decompile_code_directly() {
    let pool = ConstantPool::new();
    let signature = MethodSignature {
        class_name: CLASS_NAME,
        access_flags: MethodAccessFlags::STATIC,
        name: "noop",
        descriptor: "()V",
    };
    let body = decompile_code(&signature, &code(vec![NOP, RETURN]), &pool, &plain_options()).unwrap();
    assert_eq!("{\n\treturn;\n}", body);
}

// ---- Class driver ----

fn sample_class() -> ClassFile {
    let mut pool = ConstantPool::new();
    let this = pool.add_class(CLASS_NAME);
    let object = pool.add_class("java/lang/Object");
    let init = pool.add_method_ref("java/lang/Object", "<init>", "()V");

    let mut init_bytes = vec![ALOAD_0, INVOKESPECIAL];
    init_bytes.extend(index(init));
    init_bytes.push(RETURN);
    let constructor = method(&mut pool, MethodAccessFlags::PUBLIC, "<init>", "()V", Some(&code(init_bytes)));
    let broken = method(
        &mut pool,
        MethodAccessFlags::empty(),
        "broken",
        "()V",
        Some(&code(vec![TABLESWITCH, 0, 0, 0])),
    );

    let field_name = pool.add_utf8("count");
    let field_desc = pool.add_utf8("I");
    let field = FieldInfo::new(FieldAccessFlags::PRIVATE, field_name, field_desc, vec![]);

    let mut class = ClassFile::new(pool, ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER, this, object);
    class.fields.push(field);
    class.methods.push(constructor);
    class.methods.push(broken);
    class
}

#[test]
fn test_class_with_failed_method() {
    init_logging();
    let class = sample_class();
    let text = Decompiler::new(plain_options()).decompile(&class).unwrap();
    assert_eq!(
        "package demo;\n\npublic class Sample {\n\tprivate int count;\n\n\tpublic Sample() {\n\t\treturn;\n\t}\n\n\t// Failed to decompile method: broken()V: unsupported instruction tableswitch at offset 0\n}\n",
        text
    );
}

#[test]
fn test_class_failure_without_skipping() {
    let class = sample_class();
    let options = DecompileOptions {
        skip_failed_methods: false,
        ..plain_options()
    };
    let err = root(Decompiler::new(options).decompile(&class));
    match &err {
        DecompileError::Method { method, .. } => assert_eq!("broken()V", method),
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        err.root(),
        DecompileError::UnsupportedInstruction {
            mnemonic: "tableswitch",
            offset: 0
        }
    ));
}

#[test]
fn test_single_method_lookup() {
    let class = sample_class();
    let decompiler = Decompiler::new(plain_options());

    let results = decompiler.decompile_methods(&class);
    assert_eq!(2, results.len());
    assert!(results[0].is_ok());
    assert!(results[1].is_err());

    assert_eq!(
        "public Sample() {\n\treturn;\n}",
        decompiler.decompile_method(&class, "<init>").unwrap()
    );
    assert!(matches!(
        decompiler.decompile_method(&class, "missing"),
        Err(DecompileError::MethodNotFound { .. })
    ));
}

#[test]
fn test_interface_header_and_abstract_method() {
    let mut pool = ConstantPool::new();
    let this = pool.add_class("demo/api/Task");
    let object = pool.add_class("java/lang/Object");
    let runnable = pool.add_class("java/lang/Runnable");
    let run = method(
        &mut pool,
        MethodAccessFlags::PUBLIC | MethodAccessFlags::ABSTRACT,
        "call",
        "(I)Ljava/lang/String;",
        None,
    );
    let flags = ClassAccessFlags::PUBLIC | ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT;
    let mut class = ClassFile::new(pool, flags, this, object);
    class.interfaces.push(runnable);
    class.methods.push(run);

    let text = classfile_decompiler::decompile_class(&class, &plain_options()).unwrap();
    assert_eq!(
        "package demo.api;\n\npublic interface Task extends Runnable {\n\n\tpublic abstract String call(int arg1);\n}\n",
        text
    );
}

#[test]
fn test_method_without_code() {
    let mut pool = ConstantPool::new();
    let this = pool.add_class(CLASS_NAME);
    let empty = method(&mut pool, MethodAccessFlags::PUBLIC, "empty", "()V", None);
    let class_file = ClassFile::new(pool, ClassAccessFlags::PUBLIC, this, 0);
    let err = classfile_decompiler::decompile_method(CLASS_NAME, &empty, &class_file.const_pool, &plain_options())
        .unwrap_err();
    assert!(matches!(err.root(), DecompileError::MissingAttribute { name: "Code" }));
}
