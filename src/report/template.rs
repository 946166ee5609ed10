use super::record::VisitRecord;

// The form displays the area as a decimal, so whole numbers keep one decimal
// place ("10.0") and fractional values print as entered.
fn format_area(area: f64) -> String {
    if area.fract() == 0.0 {
        format!("{:.1}", area)
    } else {
        format!("{}", area)
    }
}

/// Renders the fixed-structure report paragraph for a validated record.
///
/// Pure and deterministic: identical records always yield byte-identical
/// text. Field values are interpolated verbatim; the vehicles and
/// cattle-brand clauses are appended only when their fields are non-empty.
pub fn render_report(record: &VisitRecord) -> String {
    let mut report = format!(
        "Em atendimento à Ordem de Serviço, vinculada ao Programa de Segurança Rural no Vale do \
         Jamari, foi realizada uma visita técnica em {data}, com início às {inicio} e término às \
         {fim}. A diligência ocorreu na propriedade rural denominada {tipo} \"{nome}\", situada \
         em {endereco}, na Zona Rural do município de {municipio}/{uf}. Procedeu-se ao \
         levantamento das coordenadas geográficas, sendo a porteira de acesso principal \
         localizada em {porteira}, e a sede/residência principal em {sede}. A área total da \
         propriedade compreende {area} {unidade}. O proprietário, Sr. \"{proprietario}\", \
         inscrito no CPF/CNPJ sob o nº \"{cpf}\", com contato telefônico principal \
         \"{telefone}\", esteve presente durante a visita. A principal atividade econômica \
         desenvolvida no local é \"{atividade}\".",
        data = record.visit_date.format("%d/%m/%Y"),
        inicio = record.start_time,
        fim = record.end_time,
        tipo = record.property_kind,
        nome = record.property_name,
        endereco = record.address,
        municipio = record.municipality,
        uf = record.state_code,
        porteira = record.gate_coordinates,
        sede = record.homestead_coordinates,
        area = format_area(record.area),
        unidade = record.area_unit,
        proprietario = record.owner_name,
        cpf = record.tax_id,
        telefone = record.phone,
        atividade = record.main_activity,
    );

    if !record.vehicles.is_empty() {
        report.push_str(&format!(
            " Foram identificados os seguintes veículos automotores na propriedade: {}.",
            record.vehicles
        ));
    }

    if !record.cattle_brand.is_empty() {
        report.push_str(&format!(
            " O rebanho possui marca/sinal/ferro registrado como \"{}\".",
            record.cattle_brand
        ));
    }

    report.push_str(&format!(
        " A visita teve como objetivo central o cadastro e georreferenciamento da propriedade \
         no sistema do Programa de Segurança Rural, o que foi efetivado. Consequentemente, foi \
         afixada a placa de identificação do programa, de nº \"{placa}\", entregue via mídia \
         digital. Adicionalmente, foram repassadas ao proprietário orientações concernentes ao \
         programa mencionado, a fim de sanar as dúvidas existentes. A presente visita cumpriu \
         os objetivos estabelecidos pela referida Ordem de Serviço, sendo as informações \
         coletadas e registradas com base nas declarações do proprietário e na verificação in \
         loco.",
        placa = record.plate_number,
    ));

    report
}
